//! Application root that owns every piece of planner state for one session.

use crate::catalog::{CacheStats, CatalogSource, FetchCache, HttpCatalogSource};
use crate::config::PlannerConfig;
use crate::drag::{DragEndEvent, DragOutcome, DragTracker};
use crate::error::PlannerError;
use crate::search::SearchView;
use crate::store::ScheduleStore;
use crate::types::{Day, TableKey};
use crate::view::{AddToTable, FilterGroup, SearchResults, TableFrame, TableGrid};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Owner of the catalog cache, schedule store, drag tracker and search state.
///
/// Render units are created from here and hold only the capabilities they need.
/// Dropping the planner tears the store down, after which any capability still held
/// fails with [`PlannerError::StoreUnavailable`].
pub struct Planner<S> {
    config: PlannerConfig,
    catalog: FetchCache<S>,
    store: ScheduleStore,
    drag: DragTracker,
    search: SearchView,
    initial_table: TableKey,
}

impl Planner<HttpCatalogSource> {
    /// Creates a planner that loads its catalog over HTTP.
    pub fn from_config(config: PlannerConfig) -> Result<Self, PlannerError> {
        let source = HttpCatalogSource::new(&config.catalog)?;
        Self::new(config, source)
    }
}

impl<S: CatalogSource> Planner<S> {
    /// Creates a planner with one empty timetable and an empty catalog.
    pub fn new(config: PlannerConfig, source: S) -> Result<Self, PlannerError> {
        config.validate()?;

        let (store, initial_table) = ScheduleStore::with_initial_table();
        let drag = DragTracker::new(config.grid.clone());
        let search = SearchView::new(Arc::new(Vec::new()), config.search.page_size);

        Ok(Self {
            catalog: FetchCache::new(source),
            config,
            store,
            drag,
            search,
            initial_table,
        })
    }

    /// Loads both catalog sources concurrently and feeds them to the search view.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of lectures loaded
    /// * `Err(PlannerError)` - If either source failed
    pub async fn load_catalog(&mut self) -> Result<usize, PlannerError> {
        let start = Instant::now();
        let lectures = self.catalog.fetch_all().await?;
        let count = lectures.len();
        self.search.set_lectures(lectures);

        info!(
            lectures = count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Catalog loaded"
        );
        Ok(count)
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    pub fn search(&mut self) -> &mut SearchView {
        &mut self.search
    }

    pub fn catalog_stats(&self) -> CacheStats {
        self.catalog.stats()
    }

    /// The table created with the planner.
    pub fn initial_table(&self) -> &TableKey {
        &self.initial_table
    }

    /// Border unit for `key`.
    pub fn frame(&self, key: &TableKey) -> TableFrame {
        TableFrame::new(key.clone(), self.drag.active_table())
    }

    /// Grid unit for `key`.
    pub fn grid(&self, key: &TableKey) -> Result<TableGrid, PlannerError> {
        let content = self.store.table(key).watch()?;
        Ok(TableGrid::new(content, self.config.grid.clone()))
    }

    /// Result list whose rows add lectures to `target`.
    pub fn search_results(&self, target: &TableKey) -> SearchResults {
        SearchResults::new(AddToTable::new(self.store.actions(), target.clone()))
    }

    pub fn day_filters(&self) -> FilterGroup<Day> {
        FilterGroup::new(Day::ALL.iter().copied().take(self.config.grid.days))
    }

    pub fn period_filters(&self) -> FilterGroup<u8> {
        FilterGroup::new(1..=self.config.grid.periods)
    }

    pub fn major_filters(&mut self) -> FilterGroup<String> {
        FilterGroup::new(self.search.majors().iter().cloned())
    }

    /// Applies a drag end reported by the drag layer.
    pub fn end_drag(&self, event: &DragEndEvent) -> Result<DragOutcome, PlannerError> {
        self.drag.end(event, &self.store.actions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CountingSource;
    use crate::drag::{Delta, DragItemId};
    use crate::search::{toggle, FilterCriteria};
    use std::sync::atomic::Ordering;

    async fn loaded_planner() -> Planner<CountingSource> {
        let mut planner = Planner::new(PlannerConfig::default(), CountingSource::default()).unwrap();
        assert_eq!(planner.load_catalog().await.unwrap(), 3);
        planner
    }

    #[tokio::test]
    async fn test_catalog_loads_each_source_once() {
        let mut planner = loaded_planner().await;
        planner.load_catalog().await.unwrap();

        let source = planner.catalog.source();
        assert_eq!(source.majors_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.liberal_arts_calls.load(Ordering::SeqCst), 1);
        assert_eq!(planner.catalog_stats().hits, 2);
    }

    #[tokio::test]
    async fn test_search_filters_loaded_catalog() {
        let mut planner = loaded_planner().await;
        planner
            .search()
            .set_criteria(FilterCriteria::default().with_major("CS"));
        let visible = planner.search().visible();
        let ids: Vec<_> = visible.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["M1"]);

        let majors = planner.major_filters().render(&Default::default());
        let labels: Vec<_> = majors.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["CS", "EE", "GE"]);
    }

    #[tokio::test]
    async fn test_units_only_render_for_their_own_slice() {
        let mut planner = loaded_planner().await;
        let a = planner.initial_table().clone();
        let b = planner.store().actions().create_table().unwrap();

        let mut frame_a = planner.frame(&a);
        let mut frame_b = planner.frame(&b);
        let mut grid_a = planner.grid(&a).unwrap();
        let mut grid_b = planner.grid(&b).unwrap();
        frame_a.render();
        frame_b.render();

        // Adding a result to table A touches only A's grid
        let visible = planner.search().visible();
        let mut results = planner.search_results(&a);
        results.render(&visible);
        assert_eq!(results.add(0).unwrap(), Some(1));
        results.render(&visible);

        assert_eq!(grid_a.render().unwrap().blocks.len(), 1);
        assert_eq!(grid_b.render().unwrap().blocks.len(), 0);
        assert_eq!((grid_a.renders(), grid_b.renders()), (2, 1));
        assert_eq!(results.row_renders(), 3);

        // Dragging A's block highlights A only; pointer moves reach no frame
        let drag_id = DragItemId::new(a.clone(), 0).to_string();
        planner.drag().start(&drag_id).unwrap();
        assert!(!frame_b.render().highlighted);
        assert!(frame_a.render().highlighted);
        for step in 0..30 {
            planner.drag().update(Delta::new(step as f64 * 3.0, 0.0));
        }
        assert!(!frame_a.needs_render());
        assert!(!frame_b.needs_render());
        assert_eq!((frame_a.renders(), frame_b.renders()), (2, 1));

        let cell = planner.config().grid.cell_width;
        let outcome = planner
            .end_drag(&DragEndEvent {
                active_id: drag_id,
                delta: Delta::new(cell, 0.0),
            })
            .unwrap();
        assert!(matches!(outcome, DragOutcome::Moved { day: Day::Tue, .. }));

        assert!(!frame_a.render().highlighted);
        frame_b.render();
        assert_eq!((frame_a.renders(), frame_b.renders()), (3, 1));
        assert_eq!(grid_a.render().unwrap().blocks[0].day, Day::Tue);
        grid_b.render().unwrap();
        assert_eq!((grid_a.renders(), grid_b.renders()), (3, 1));
    }

    #[tokio::test]
    async fn test_toggling_one_filter_renders_one_checkbox() {
        let mut planner = loaded_planner().await;
        let mut days = planner.day_filters();
        days.render(&planner.search().criteria().days.clone());

        planner.search().update_criteria(|c| {
            toggle(&mut c.days, Day::Wed);
        });
        let views = days.render(&planner.search().criteria().days.clone());

        assert!(views[Day::Wed.index()].checked);
        assert_eq!(days.renders(), vec![1, 1, 2, 1, 1, 1]);
    }

    #[tokio::test]
    async fn test_removed_table_grid_reports_removal() {
        let planner = loaded_planner().await;
        let extra = planner.store().actions().duplicate_table(planner.initial_table()).unwrap();
        let mut grid = planner.grid(&extra).unwrap();

        planner.store().actions().remove_table(&extra).unwrap();
        assert!(matches!(grid.render(), Err(PlannerError::TableRemoved { .. })));
    }
}
