use crate::catalog::Catalog;
use crate::error::PlannerError;
use crate::memo::ByAddress;
use crate::store::ScheduleActions;
use crate::types::{Lecture, TableKey};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// "Add this lecture to the table" action shared by every result row.
///
/// Its identity never changes while the search targets the same table, so rows do not
/// need to be rebuilt when it is handed out.
#[derive(Clone)]
pub struct AddToTable {
    actions: ScheduleActions,
    target: TableKey,
}

impl AddToTable {
    pub fn new(actions: ScheduleActions, target: TableKey) -> Self {
        Self { actions, target }
    }

    pub fn target(&self) -> &TableKey {
        &self.target
    }

    /// Adds every placement of `lecture` to the target table.
    pub fn call(&self, lecture: &Arc<Lecture>) -> Result<usize, PlannerError> {
        self.actions.add_lecture(&self.target, lecture)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: String,
    pub title: String,
    pub credits: String,
    pub grade: u8,
    pub major: String,
    pub schedule: String,
}

/// One search result row. Depends only on its lecture, which never changes for the
/// life of the row, so it renders exactly once.
pub struct SearchRow {
    lecture: Arc<Lecture>,
    view: RowView,
}

impl SearchRow {
    fn new(lecture: Arc<Lecture>) -> Self {
        let view = RowView {
            id: lecture.id.clone(),
            title: lecture.title.clone(),
            credits: lecture.credits.clone(),
            grade: lecture.grade,
            major: lecture.major.clone(),
            schedule: lecture.schedule.clone(),
        };
        Self { lecture, view }
    }

    pub fn lecture(&self) -> &Arc<Lecture> {
        &self.lecture
    }

    pub fn view(&self) -> &RowView {
        &self.view
    }
}

/// The visible search result list.
///
/// When the visible list changes, rows whose lecture is the same allocation are kept and
/// only new lectures get new rows.
pub struct SearchResults {
    on_add: AddToTable,
    shown: Option<ByAddress<Vec<Arc<Lecture>>>>,
    rows: Vec<SearchRow>,
    row_renders: u64,
}

impl SearchResults {
    pub fn new(on_add: AddToTable) -> Self {
        Self {
            on_add,
            shown: None,
            rows: Vec::new(),
            row_renders: 0,
        }
    }

    /// Brings the rows in line with `visible`.
    pub fn render(&mut self, visible: &Catalog) -> &[SearchRow] {
        let input = ByAddress(Arc::clone(visible));
        if self.shown.as_ref() == Some(&input) {
            return &self.rows;
        }

        let mut previous: HashMap<*const Lecture, SearchRow> = self
            .rows
            .drain(..)
            .map(|row| (Arc::as_ptr(&row.lecture), row))
            .collect();

        for lecture in visible.iter() {
            let row = match previous.remove(&Arc::as_ptr(lecture)) {
                Some(row) => row,
                None => {
                    self.row_renders += 1;
                    SearchRow::new(Arc::clone(lecture))
                }
            };
            self.rows.push(row);
        }

        self.shown = Some(input);
        &self.rows
    }

    /// Adds the lecture of row `index` to the target table.
    ///
    /// Returns how many placements were added, or `None` if there is no such row.
    pub fn add(&self, index: usize) -> Result<Option<usize>, PlannerError> {
        match self.rows.get(index) {
            Some(row) => self.on_add.call(&row.lecture).map(Some),
            None => Ok(None),
        }
    }

    pub fn target(&self) -> &TableKey {
        self.on_add.target()
    }

    /// Total number of rows built so far.
    pub fn row_renders(&self) -> u64 {
        self.row_renders
    }
}
