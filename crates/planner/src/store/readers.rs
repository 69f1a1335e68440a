use super::{upgrade, StoreInner};
use crate::error::PlannerError;
use crate::types::{Schedules, TableKey};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

/// Read capability for the ordered list of table keys.
///
/// Does not observe any table's content.
#[derive(Clone)]
pub struct TableKeys {
    inner: Weak<StoreInner>,
}

impl TableKeys {
    pub(super) fn new(inner: Weak<StoreInner>) -> Self {
        Self { inner }
    }

    /// Current keys in creation order.
    pub fn list(&self) -> Result<Arc<Vec<TableKey>>, PlannerError> {
        let inner = upgrade(&self.inner)?;
        let keys = inner.keys.borrow().clone();
        Ok(keys)
    }

    /// Subscribes to key-list changes. The current list counts as already seen.
    pub fn watch(&self) -> Result<watch::Receiver<Arc<Vec<TableKey>>>, PlannerError> {
        Ok(upgrade(&self.inner)?.keys.subscribe())
    }
}

/// Read capability scoped to one table.
#[derive(Clone)]
pub struct TableContent {
    key: TableKey,
    inner: Weak<StoreInner>,
}

impl TableContent {
    pub(super) fn new(key: TableKey, inner: Weak<StoreInner>) -> Self {
        Self { key, inner }
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    /// Current entries of this table. An absent table reads as empty.
    pub fn read(&self) -> Result<Schedules, PlannerError> {
        Ok(upgrade(&self.inner)?.read(&self.key))
    }

    /// Subscribes to this table's content. The current content counts as already seen.
    pub fn watch(&self) -> Result<TableWatch, PlannerError> {
        let inner = upgrade(&self.inner)?;
        let rx = inner
            .tables
            .get(&self.key)
            .map(|sender| sender.subscribe())
            .ok_or_else(|| PlannerError::UnknownTable {
                key: self.key.to_string(),
            })?;

        Ok(TableWatch {
            key: self.key.clone(),
            rx,
        })
    }
}

/// Live subscription to one table's content.
///
/// Once the table is removed (or the store torn down) every method reports
/// [`PlannerError::TableRemoved`] and the subscription should be dropped.
pub struct TableWatch {
    key: TableKey,
    rx: watch::Receiver<Schedules>,
}

impl TableWatch {
    pub fn key(&self) -> &TableKey {
        &self.key
    }

    /// Latest content without marking it seen.
    pub fn current(&self) -> Schedules {
        self.rx.borrow().clone()
    }

    /// Returns true if the content changed since it was last seen.
    pub fn has_changed(&self) -> Result<bool, PlannerError> {
        self.rx.has_changed().map_err(|_| self.removed())
    }

    /// Returns the latest content and marks it seen.
    pub fn mark_seen(&mut self) -> Schedules {
        self.rx.borrow_and_update().clone()
    }

    /// Waits for the next change of this table and returns the new content.
    pub async fn changed(&mut self) -> Result<Schedules, PlannerError> {
        self.rx.changed().await.map_err(|_| self.removed())?;
        Ok(self.mark_seen())
    }

    fn removed(&self) -> PlannerError {
        PlannerError::TableRemoved {
            key: self.key.to_string(),
        }
    }
}
