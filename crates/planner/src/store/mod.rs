//! Keyed timetable store with one change channel per table.
//!
//! The store is split into capabilities so that a dependent can only observe what it
//! holds a handle for:
//! - [`TableKeys`] sees the ordered list of table keys;
//! - [`TableContent`] sees one table's entries;
//! - [`ScheduleActions`] writes.
//!
//! Every table owns its own `watch` channel, so a write to one key never wakes a reader
//! of another. Handles keep only a weak reference: once the owning [`ScheduleStore`] is
//! dropped they fail with [`PlannerError::StoreUnavailable`].

mod actions;
mod readers;

pub use actions::ScheduleActions;
pub use readers::{TableContent, TableKeys, TableWatch};

use crate::error::PlannerError;
use crate::types::{ScheduleEntry, Schedules, TableKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::info;

const KEY_PREFIX: &str = "schedule";

pub(crate) struct StoreInner {
    tables: DashMap<TableKey, watch::Sender<Schedules>>,
    keys: watch::Sender<Arc<Vec<TableKey>>>,
    next_id: AtomicU64,
}

impl StoreInner {
    /// Inserts a table under a freshly generated key.
    ///
    /// Keys come from a per-store counter, so two calls can never produce the same key.
    fn insert_table(&self, content: Schedules) -> TableKey {
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
            let key = TableKey::new(format!("{KEY_PREFIX}-{id}"));

            if let Entry::Vacant(slot) = self.tables.entry(key.clone()) {
                slot.insert(watch::channel(content.clone()).0);
                self.keys.send_modify(|keys| {
                    let mut next = keys.as_ref().clone();
                    next.push(key.clone());
                    *keys = Arc::new(next);
                });
                return key;
            }
        }
    }

    fn remove_table(&self, key: &TableKey) -> bool {
        // Dropping the sender closes every content subscription for this key
        if self.tables.remove(key).is_none() {
            return false;
        }
        self.keys.send_modify(|keys| {
            *keys = Arc::new(keys.iter().filter(|k| *k != key).cloned().collect());
        });
        true
    }

    fn current(&self, key: &TableKey) -> Option<Schedules> {
        let sender = self.tables.get(key)?;
        let current = sender.borrow().clone();
        Some(current)
    }

    fn read(&self, key: &TableKey) -> Schedules {
        self.current(key).unwrap_or_default()
    }

    /// Read-modify-write against the latest value of one table.
    ///
    /// `update` returns `None` to leave the table untouched, in which case readers are not
    /// notified. It must not call back into the store.
    fn modify<F>(&self, key: &TableKey, update: F) -> Result<Option<Schedules>, PlannerError>
    where
        F: FnOnce(&[ScheduleEntry]) -> Option<Vec<ScheduleEntry>>,
    {
        let sender = self.tables.get(key).ok_or_else(|| PlannerError::UnknownTable {
            key: key.to_string(),
        })?;

        let mut installed = None;
        sender.send_if_modified(|current| match update(current.as_slice()) {
            Some(next) => {
                let next = Arc::new(next);
                *current = Arc::clone(&next);
                installed = Some(next);
                true
            }
            None => false,
        });

        Ok(installed)
    }
}

/// Owner of all timetables for one application lifetime.
///
/// Create it at the application root and hand out capabilities; dropping it tears the
/// store down.
pub struct ScheduleStore {
    inner: Arc<StoreInner>,
}

impl ScheduleStore {
    /// Creates a store with no tables.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                tables: DashMap::new(),
                keys: watch::channel(Arc::new(Vec::new())).0,
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Creates a store holding a single empty table.
    pub fn with_initial_table() -> (Self, TableKey) {
        let store = Self::new();
        let key = store.inner.insert_table(Schedules::default());
        info!(table = %key, "Created initial timetable");
        (store, key)
    }

    /// Capability to observe the key list.
    pub fn keys(&self) -> TableKeys {
        TableKeys::new(self.weak())
    }

    /// Capability to observe one table's content.
    pub fn table(&self, key: &TableKey) -> TableContent {
        TableContent::new(key.clone(), self.weak())
    }

    /// Capability to modify tables.
    pub fn actions(&self) -> ScheduleActions {
        ScheduleActions::new(self.weak())
    }

    /// Whole-map snapshot, in key order.
    pub fn snapshot(&self) -> Vec<(TableKey, Schedules)> {
        let keys = self.inner.keys.borrow().clone();
        keys.iter()
            .map(|key| (key.clone(), self.inner.read(key)))
            .collect()
    }

    fn weak(&self) -> Weak<StoreInner> {
        Arc::downgrade(&self.inner)
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn upgrade(inner: &Weak<StoreInner>) -> Result<Arc<StoreInner>, PlannerError> {
    inner.upgrade().ok_or(PlannerError::StoreUnavailable)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Day, Lecture};

    pub(crate) fn lecture(id: &str, schedule: &str) -> Arc<Lecture> {
        Arc::new(Lecture {
            id: id.to_string(),
            title: format!("Lecture {id}"),
            credits: "3".to_string(),
            grade: 1,
            major: "CS".to_string(),
            schedule: schedule.to_string(),
        })
    }

    pub(crate) fn entry(id: &str, day: Day, range: &[u8]) -> ScheduleEntry {
        ScheduleEntry {
            day,
            range: range.to_vec(),
            lecture: lecture(id, ""),
            room: None,
        }
    }

    fn ids(entries: &[ScheduleEntry]) -> Vec<String> {
        entries.iter().map(|e| e.lecture.id.clone()).collect()
    }

    #[test]
    fn test_absent_key_reads_empty() {
        let store = ScheduleStore::new();
        let content = store.table(&TableKey::new("missing"));
        assert!(content.read().unwrap().is_empty());
    }

    #[test]
    fn test_writes_are_isolated_per_key() {
        let store = ScheduleStore::new();
        let actions = store.actions();
        let a = actions.create_table().unwrap();
        let b = actions.create_table().unwrap();

        let watch_a = store.table(&a).watch().unwrap();
        let watch_b = store.table(&b).watch().unwrap();

        actions
            .write(&a, |prev| [prev, &[entry("1", Day::Mon, &[1])]].concat())
            .unwrap();
        actions
            .write(&b, |prev| [prev, &[entry("x", Day::Tue, &[2])]].concat())
            .unwrap();
        actions
            .write(&a, |prev| [prev, &[entry("2", Day::Wed, &[3])]].concat())
            .unwrap();

        assert_eq!(ids(&store.table(&a).read().unwrap()), vec!["1", "2"]);
        assert_eq!(ids(&store.table(&b).read().unwrap()), vec!["x"]);
        assert!(watch_a.has_changed().unwrap());
        assert!(watch_b.has_changed().unwrap());

        let mut watch_b = store.table(&b).watch().unwrap();
        watch_b.mark_seen();
        actions.replace(&a, Vec::new()).unwrap();
        assert!(!watch_b.has_changed().unwrap());
    }

    #[test]
    fn test_back_to_back_updaters_compose() {
        let (store, key) = ScheduleStore::with_initial_table();
        let drag_end = store.actions();
        let search_add = store.actions();

        search_add
            .write(&key, |prev| [prev, &[entry("added", Day::Mon, &[1])]].concat())
            .unwrap();
        drag_end
            .write(&key, |prev| [prev, &[entry("moved", Day::Tue, &[4])]].concat())
            .unwrap();

        assert_eq!(ids(&store.table(&key).read().unwrap()), vec!["added", "moved"]);
    }

    #[test]
    fn test_duplicate_is_independent_snapshot() {
        let (store, source) = ScheduleStore::with_initial_table();
        let actions = store.actions();
        actions
            .replace(&source, vec![entry("1", Day::Mon, &[1, 2])])
            .unwrap();

        let copy = actions.duplicate_table(&source).unwrap();
        assert_ne!(copy, source);
        assert_eq!(
            *store.table(&copy).read().unwrap(),
            *store.table(&source).read().unwrap()
        );

        actions
            .write(&source, |prev| [prev, &[entry("2", Day::Fri, &[5])]].concat())
            .unwrap();
        actions.replace(&copy, Vec::new()).unwrap();

        assert_eq!(ids(&store.table(&source).read().unwrap()), vec!["1", "2"]);
        assert!(store.table(&copy).read().unwrap().is_empty());
        assert_eq!(store.keys().list().unwrap().as_slice(), &[source, copy]);
    }

    #[test]
    fn test_remove_updates_keys_and_closes_content() {
        let (store, first) = ScheduleStore::with_initial_table();
        let actions = store.actions();
        let second = actions.create_table().unwrap();

        let keys = store.keys().watch().unwrap();
        let content = store.table(&second).watch().unwrap();

        assert!(actions.remove_table(&second).unwrap());
        assert!(keys.has_changed().unwrap());
        assert_eq!(keys.borrow().as_slice(), &[first.clone()]);
        assert!(matches!(
            content.has_changed(),
            Err(PlannerError::TableRemoved { .. })
        ));

        assert!(!actions.remove_table(&second).unwrap());
        assert!(matches!(
            actions.replace(&second, Vec::new()),
            Err(PlannerError::UnknownTable { .. })
        ));
        assert!(store.table(&second).read().unwrap().is_empty());
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let store = ScheduleStore::new();
        let actions = store.actions();
        let mut keys: Vec<TableKey> = (0..500).map(|_| actions.create_table().unwrap()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 500);
    }

    #[test]
    fn test_handles_fail_after_teardown() {
        let (store, key) = ScheduleStore::with_initial_table();
        let actions = store.actions();
        let content = store.table(&key);
        let keys = store.keys();
        drop(store);

        assert_eq!(actions.create_table(), Err(PlannerError::StoreUnavailable));
        assert_eq!(content.read(), Err(PlannerError::StoreUnavailable));
        assert!(matches!(keys.list(), Err(PlannerError::StoreUnavailable)));
    }

    #[test]
    fn test_snapshot_follows_key_order() {
        let (store, first) = ScheduleStore::with_initial_table();
        let second = store.actions().create_table().unwrap();
        store
            .actions()
            .replace(&second, vec![entry("x", Day::Sat, &[9])])
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].0, first);
        assert_eq!(ids(&snapshot[1].1), vec!["x"]);
    }
}
