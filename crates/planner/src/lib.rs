//! Headless core of a multi-timetable lecture planner.
//!
//! The crate is organized around selective invalidation: every derived view depends on
//! the smallest slice of state it needs, and each slice has its own change channel.
//! - [`catalog`] loads the lecture catalog, sharing in-flight requests.
//! - [`search`] filters and pages the catalog with memoized derivations.
//! - [`store`] holds timetables keyed by [`TableKey`], one channel per table.
//! - [`drag`] separates the dragged block's owning table from its pointer position.
//! - [`view`] contains the render units built on top of the above.

pub mod catalog;
pub mod config;
pub mod drag;
pub mod error;
pub mod logging;
pub mod memo;
pub mod parser;
pub mod planner;
pub mod search;
pub mod store;
pub mod types;
pub mod view;

pub use config::PlannerConfig;
pub use error::PlannerError;
pub use planner::Planner;
pub use types::{Day, Lecture, ScheduleEntry, Schedules, TableKey};
