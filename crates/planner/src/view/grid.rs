use crate::config::GridConfig;
use crate::drag::DragItemId;
use crate::error::PlannerError;
use crate::store::TableWatch;
use crate::types::{Day, ScheduleEntry, TableKey};
use serde::Serialize;

/// One lecture block as laid out on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridBlock {
    /// Identifier handed to the drag layer
    pub drag_id: String,
    pub day: Day,
    pub start_period: u8,
    pub span: usize,
    pub title: String,
    pub room: Option<String>,
}

/// Laid-out content of one timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridView {
    pub key: TableKey,
    pub days: Vec<Day>,
    pub periods: u8,
    pub blocks: Vec<GridBlock>,
}

impl GridView {
    fn build(key: &TableKey, grid: &GridConfig, entries: &[ScheduleEntry]) -> Self {
        let blocks = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let start_period = *entry.range.first()?;
                Some(GridBlock {
                    drag_id: DragItemId::new(key.clone(), index).to_string(),
                    day: entry.day,
                    start_period,
                    span: entry.range.len(),
                    title: entry.lecture.title.clone(),
                    room: entry.room.clone(),
                })
            })
            .collect();

        GridView {
            key: key.clone(),
            days: Day::ALL.iter().copied().take(grid.days).collect(),
            periods: grid.periods,
            blocks,
        }
    }
}

/// Grid body of one timetable. Depends only on that table's content and the static
/// grid geometry.
pub struct TableGrid {
    content: TableWatch,
    grid: GridConfig,
    view: GridView,
    renders: u64,
}

impl TableGrid {
    pub fn new(mut content: TableWatch, grid: GridConfig) -> Self {
        let entries = content.mark_seen();
        let view = GridView::build(content.key(), &grid, &entries);
        Self {
            content,
            grid,
            view,
            renders: 1,
        }
    }

    /// Returns the current view, rebuilding it only if the table changed.
    ///
    /// Fails with [`PlannerError::TableRemoved`] once the table is gone; the unit should
    /// then be dropped.
    pub fn render(&mut self) -> Result<&GridView, PlannerError> {
        if self.content.has_changed()? {
            let entries = self.content.mark_seen();
            self.view = GridView::build(self.content.key(), &self.grid, &entries);
            self.renders += 1;
        }
        Ok(&self.view)
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{entry, lecture};
    use crate::store::ScheduleStore;

    #[test]
    fn test_grid_lays_out_blocks_with_drag_ids() {
        let (store, key) = ScheduleStore::with_initial_table();
        store
            .actions()
            .add_lecture(&key, &lecture("A", "화3~5(C1001)"))
            .unwrap();

        let mut grid = TableGrid::new(store.table(&key).watch().unwrap(), GridConfig::default());
        let view = grid.render().unwrap();

        assert_eq!(view.days.len(), 6);
        assert_eq!(view.periods, 24);
        assert_eq!(
            view.blocks,
            vec![GridBlock {
                drag_id: format!("{key}:0"),
                day: Day::Tue,
                start_period: 3,
                span: 3,
                title: "Lecture A".to_string(),
                room: Some("C1001".to_string()),
            }]
        );
        assert_eq!(grid.renders(), 1);
    }

    #[test]
    fn test_grid_ignores_other_tables() {
        let (store, key) = ScheduleStore::with_initial_table();
        let other = store.actions().create_table().unwrap();
        let mut grid = TableGrid::new(store.table(&key).watch().unwrap(), GridConfig::default());

        store
            .actions()
            .replace(&other, vec![entry("B", Day::Fri, &[1])])
            .unwrap();
        assert!(grid.render().unwrap().blocks.is_empty());
        assert_eq!(grid.renders(), 1);

        store
            .actions()
            .replace(&key, vec![entry("A", Day::Mon, &[2, 3])])
            .unwrap();
        assert_eq!(grid.render().unwrap().blocks.len(), 1);
        assert_eq!(grid.renders(), 2);
    }
}
