//! Lecture search: filter criteria, the pure filter functions, and the memoized view
//! that ties them to a page cursor.

mod criteria;
mod filter;
mod view;

pub use criteria::{toggle, FilterCriteria};
pub use filter::{distinct_majors, filter_lectures, last_page, matches, visible_prefix};
pub use view::{DerivationCounts, SearchView};
