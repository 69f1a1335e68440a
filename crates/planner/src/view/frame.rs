use crate::memo::Memo;
use crate::types::TableKey;
use tokio::sync::watch;

/// Border of one timetable, highlighted while one of its blocks is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub key: TableKey,
    pub highlighted: bool,
}

/// Depends only on its own key and the drag tracker's active table.
///
/// A change of active table that does not flip this frame's highlight does not
/// re-render it, and drag position updates never reach it at all.
pub struct TableFrame {
    key: TableKey,
    active_table: watch::Receiver<Option<TableKey>>,
    view: Memo<bool, FrameView>,
}

impl TableFrame {
    pub fn new(key: TableKey, active_table: watch::Receiver<Option<TableKey>>) -> Self {
        Self {
            key,
            active_table,
            view: Memo::new(),
        }
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    /// Returns true if the active drag table changed since the last render.
    pub fn needs_render(&self) -> bool {
        self.active_table.has_changed().unwrap_or(false)
    }

    pub fn render(&mut self) -> FrameView {
        let highlighted = self.active_table.borrow_and_update().as_ref() == Some(&self.key);
        self.view.get(highlighted, |&highlighted| FrameView {
            key: self.key.clone(),
            highlighted,
        })
    }

    pub fn renders(&self) -> u64 {
        self.view.computations()
    }
}
