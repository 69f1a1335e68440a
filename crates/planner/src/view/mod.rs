//! Render units for the timetable screen.
//!
//! Each unit holds exactly the inputs it depends on and rebuilds its view only when one
//! of them changes. Every unit counts its renders so callers can verify that an update
//! reached only the units it should have.

mod filters;
mod frame;
mod grid;
mod results;

pub use filters::{CheckboxView, FilterCheckbox, FilterGroup};
pub use frame::{FrameView, TableFrame};
pub use grid::{GridBlock, GridView, TableGrid};
pub use results::{AddToTable, RowView, SearchResults, SearchRow};
