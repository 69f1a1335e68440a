//! Drag session tracking for timetable blocks.
//!
//! A drag produces two signals with very different rates. The pixel delta changes on
//! every pointer move; the table that owns the dragged block changes only when a drag
//! starts or stops. They live on separate channels so that per-table highlighting only
//! ever wakes for the second one.

use crate::config::GridConfig;
use crate::error::PlannerError;
use crate::store::ScheduleActions;
use crate::types::{Day, ScheduleEntry, TableKey};
use std::fmt;
use std::str::FromStr;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Composite identifier of a dragged block: `<tableKey>:<indexWithinTable>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DragItemId {
    pub table: TableKey,
    pub index: usize,
}

impl DragItemId {
    pub fn new(table: TableKey, index: usize) -> Self {
        Self { table, index }
    }
}

impl FromStr for DragItemId {
    type Err = PlannerError;

    /// Splits on the last `:` so table keys may themselves contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidDragId { id: s.to_string() };
        let (table, index) = s.rsplit_once(':').ok_or_else(invalid)?;
        if table.is_empty() {
            return Err(invalid());
        }
        let index = index.parse::<usize>().map_err(|_| invalid())?;
        Ok(Self::new(TableKey::new(table), index))
    }
}

impl fmt::Display for DragItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.index)
    }
}

/// Pixel displacement of the dragged block from its origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Delta {
    pub x: f64,
    pub y: f64,
}

impl Delta {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The single active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub item: DragItemId,
    pub delta: Delta,
}

/// Drag-end notification from the drag-and-drop layer.
#[derive(Debug, Clone)]
pub struct DragEndEvent {
    pub active_id: String,
    pub delta: Delta,
}

/// What a drag end did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The entry now sits at a new day/range
    Moved {
        table: TableKey,
        index: usize,
        day: Day,
        range: Vec<u8>,
    },
    /// The delta rounded to zero cells
    Unchanged,
    /// The target would leave the grid; nothing was written
    OutOfBounds,
    /// The dragged entry (or its table) no longer exists; nothing was written
    Missing,
}

/// Tracks the active drag and derives the table that owns it.
pub struct DragTracker {
    grid: GridConfig,
    session: watch::Sender<Option<DragSession>>,
    active_table: watch::Sender<Option<TableKey>>,
}

impl DragTracker {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            session: watch::channel(None).0,
            active_table: watch::channel(None).0,
        }
    }

    /// Starts a drag of the block identified by `active_id`.
    pub fn start(&self, active_id: &str) -> Result<(), PlannerError> {
        let item: DragItemId = active_id.parse()?;
        debug!(item = %item, "Drag started");
        let table = item.table.clone();
        self.session.send_replace(Some(DragSession {
            item,
            delta: Delta::default(),
        }));
        self.set_active_table(Some(table));
        Ok(())
    }

    /// Records a new pointer displacement. Only the session channel is notified.
    pub fn update(&self, delta: Delta) {
        self.session.send_if_modified(|session| match session {
            Some(session) if session.delta != delta => {
                session.delta = delta;
                true
            }
            _ => false,
        });
    }

    /// Abandons the drag without touching the store.
    pub fn cancel(&self) {
        debug!("Drag cancelled");
        self.clear();
    }

    /// Finishes the drag, moving the dragged entry by the delta converted to grid cells.
    ///
    /// Targets outside the grid are rejected and leave the store unchanged.
    pub fn end(
        &self,
        event: &DragEndEvent,
        actions: &ScheduleActions,
    ) -> Result<DragOutcome, PlannerError> {
        self.clear();

        let item: DragItemId = event.active_id.parse()?;
        let Some((day_shift, period_shift)) = self.cell_offset(event.delta) else {
            warn!(item = %item, delta = ?event.delta, "Drag ended off the grid");
            return Ok(DragOutcome::OutOfBounds);
        };
        if day_shift == 0 && period_shift == 0 {
            return Ok(DragOutcome::Unchanged);
        }

        let grid = &self.grid;
        let mut rejected = false;
        let result = actions.update_entry(&item.table, item.index, |entry| {
            let moved = shift_entry(entry, day_shift, period_shift, grid);
            rejected = moved.is_none();
            moved
        });

        let outcome = match result {
            Ok(Some(moved)) => DragOutcome::Moved {
                table: item.table.clone(),
                index: item.index,
                day: moved.day,
                range: moved.range,
            },
            Ok(None) if rejected => DragOutcome::OutOfBounds,
            Ok(None) | Err(PlannerError::UnknownTable { .. }) => DragOutcome::Missing,
            Err(e) => return Err(e),
        };

        match &outcome {
            DragOutcome::Moved { day, .. } => {
                debug!(item = %item, day = %day, "Drag moved entry")
            }
            other => warn!(item = %item, outcome = ?other, "Drag ended without a move"),
        }
        Ok(outcome)
    }

    /// Subscribes to the table owning the dragged block. Pointer moves never wake it.
    pub fn active_table(&self) -> watch::Receiver<Option<TableKey>> {
        self.active_table.subscribe()
    }

    /// Subscribes to the full session, including every pointer move.
    pub fn session(&self) -> watch::Receiver<Option<DragSession>> {
        self.session.subscribe()
    }

    pub fn current_table(&self) -> Option<TableKey> {
        self.active_table.borrow().clone()
    }

    /// Converts a pixel delta into whole (day, period) cell offsets.
    ///
    /// Returns `None` for a non-finite delta.
    pub fn cell_offset(&self, delta: Delta) -> Option<(i64, i64)> {
        let days = (delta.x / self.grid.cell_width).round();
        let periods = (delta.y / self.grid.cell_height).round();
        if !days.is_finite() || !periods.is_finite() {
            return None;
        }
        // `as` saturates at the i64 bounds
        Some((days as i64, periods as i64))
    }

    fn clear(&self) {
        self.session.send_if_modified(|session| session.take().is_some());
        self.set_active_table(None);
    }

    fn set_active_table(&self, table: Option<TableKey>) {
        self.active_table.send_if_modified(|current| {
            if *current == table {
                false
            } else {
                *current = table;
                true
            }
        });
    }
}

/// Applies a cell offset to an entry, or `None` if the result would leave the grid.
fn shift_entry(
    entry: &ScheduleEntry,
    day_shift: i64,
    period_shift: i64,
    grid: &GridConfig,
) -> Option<ScheduleEntry> {
    let day_index = (entry.day.index() as i64).checked_add(day_shift)?;
    if day_index < 0 || day_index >= grid.days as i64 {
        return None;
    }
    let day = Day::from_index(day_index as usize)?;

    let range = entry
        .range
        .iter()
        .map(|&period| {
            let shifted = (period as i64).checked_add(period_shift)?;
            (1..=grid.periods as i64)
                .contains(&shifted)
                .then_some(shifted as u8)
        })
        .collect::<Option<Vec<u8>>>()?;

    Some(ScheduleEntry {
        day,
        range,
        ..entry.clone()
    })
}
