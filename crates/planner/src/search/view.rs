//! Memoized search state: catalog, criteria and page cursor with their derived lists.

use super::criteria::FilterCriteria;
use super::filter::{distinct_majors, filter_lectures, last_page, visible_prefix};
use crate::catalog::Catalog;
use crate::memo::{ByAddress, Memo};
use crate::types::Lecture;
use std::sync::Arc;
use tracing::debug;

type LectureList = ByAddress<Vec<Arc<Lecture>>>;

/// Search state and its derived views.
///
/// Each derived list is recomputed only when its own inputs change:
/// - the filtered list depends on the catalog (by identity) and the criteria (by value);
/// - the visible list depends on the filtered list (by identity) and the page;
/// - the major list depends on the catalog alone.
pub struct SearchView {
    lectures: Catalog,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
    filtered: Memo<(LectureList, FilterCriteria), Catalog>,
    visible: Memo<(LectureList, usize), Catalog>,
    majors: Memo<LectureList, Arc<Vec<String>>>,
}

/// How often each derivation has actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationCounts {
    pub filtered: u64,
    pub visible: u64,
    pub majors: u64,
}

impl SearchView {
    /// Creates a view over `lectures` showing the first page with no filters.
    pub fn new(lectures: Catalog, page_size: usize) -> Self {
        Self {
            lectures,
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: page_size.max(1),
            filtered: Memo::new(),
            visible: Memo::new(),
            majors: Memo::new(),
        }
    }

    /// Replaces the catalog, e.g. once a fetch completes. A different catalog rewinds
    /// the list to the first page.
    pub fn set_lectures(&mut self, lectures: Catalog) {
        if !Arc::ptr_eq(&lectures, &self.lectures) {
            self.lectures = lectures;
            self.page = 1;
        }
    }

    pub fn lectures(&self) -> &Catalog {
        &self.lectures
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replaces the criteria. A change rewinds the list to the first page.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            debug!(?criteria, "Search criteria changed");
            self.criteria = criteria;
            self.page = 1;
        }
    }

    /// Edits the criteria in place; same paging behavior as [`set_criteria`](Self::set_criteria).
    pub fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) {
        let mut criteria = self.criteria.clone();
        edit(&mut criteria);
        self.set_criteria(criteria);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Reveals one more page if there is one. Returns whether the page advanced.
    pub fn load_more(&mut self) -> bool {
        if self.page < self.last_page() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Lectures matching the current criteria, in catalog order.
    pub fn filtered(&mut self) -> Catalog {
        let input = (ByAddress(Arc::clone(&self.lectures)), self.criteria.clone());
        self.filtered.get(input, |(lectures, criteria)| {
            Arc::new(filter_lectures(&lectures.0, criteria))
        })
    }

    /// The revealed prefix of the filtered list.
    pub fn visible(&mut self) -> Catalog {
        let filtered = self.filtered();
        let page_size = self.page_size;
        self.visible
            .get((ByAddress(filtered), self.page), |(filtered, page)| {
                Arc::new(visible_prefix(filtered.0.as_slice(), *page, page_size))
            })
    }

    pub fn last_page(&mut self) -> usize {
        last_page(self.filtered().len(), self.page_size)
    }

    /// Distinct majors in the catalog, for building the major filter.
    pub fn majors(&mut self) -> Arc<Vec<String>> {
        self.majors
            .get(ByAddress(Arc::clone(&self.lectures)), |lectures| {
                Arc::new(distinct_majors(&lectures.0))
            })
    }

    pub fn derivation_counts(&self) -> DerivationCounts {
        DerivationCounts {
            filtered: self.filtered.computations(),
            visible: self.visible.computations(),
            majors: self.majors.computations(),
        }
    }
}
