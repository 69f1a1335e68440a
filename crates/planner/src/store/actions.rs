use super::{upgrade, StoreInner};
use crate::error::PlannerError;
use crate::parser::lecture_entries;
use crate::types::{Day, Lecture, ScheduleEntry, Schedules, TableKey};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Write capability for the schedule store.
///
/// Cheap to clone and stable for the life of the store, so it can be handed to every
/// row or drag handler without changing their inputs.
#[derive(Clone)]
pub struct ScheduleActions {
    inner: Weak<StoreInner>,
}

impl ScheduleActions {
    pub(super) fn new(inner: Weak<StoreInner>) -> Self {
        Self { inner }
    }

    /// Replaces a table's entries with `updater(latest entries)`.
    ///
    /// The updater always sees the latest state, so writers firing back to back never
    /// overwrite each other. It must not call back into the store. If it returns content
    /// equal to the current entries nothing is installed and readers are not notified.
    pub fn write<F>(&self, key: &TableKey, updater: F) -> Result<Schedules, PlannerError>
    where
        F: FnOnce(&[ScheduleEntry]) -> Vec<ScheduleEntry>,
    {
        let inner = upgrade(&self.inner)?;
        let installed = inner.modify(key, |current| {
            let next = updater(current);
            (next.as_slice() != current).then_some(next)
        })?;

        match installed {
            Some(entries) => {
                debug!(table = %key, "Timetable written");
                Ok(entries)
            }
            None => Ok(inner.read(key)),
        }
    }

    /// Replaces a table's entries outright.
    pub fn replace(&self, key: &TableKey, entries: Vec<ScheduleEntry>) -> Result<Schedules, PlannerError> {
        self.write(key, move |_| entries)
    }

    /// Creates a new empty table under a fresh key.
    pub fn create_table(&self) -> Result<TableKey, PlannerError> {
        let key = upgrade(&self.inner)?.insert_table(Schedules::default());
        info!(table = %key, "Created timetable");
        Ok(key)
    }

    /// Removes a table. Returns false if no such table existed.
    pub fn remove_table(&self, key: &TableKey) -> Result<bool, PlannerError> {
        let removed = upgrade(&self.inner)?.remove_table(key);
        if removed {
            info!(table = %key, "Removed timetable");
        }
        Ok(removed)
    }

    /// Creates a new table holding a copy of `source`'s current entries.
    ///
    /// The copy shares no state with the source: later writes to either leave the other
    /// alone.
    pub fn duplicate_table(&self, source: &TableKey) -> Result<TableKey, PlannerError> {
        let inner = upgrade(&self.inner)?;
        let snapshot = inner
            .current(source)
            .ok_or_else(|| PlannerError::UnknownTable {
                key: source.to_string(),
            })?;

        // Writes always install a new Arc, so sharing the snapshot is a true copy
        let key = inner.insert_table(snapshot);
        info!(table = %key, source = %source, "Duplicated timetable");
        Ok(key)
    }

    /// Appends every placement of `lecture` to a table. Returns how many were added.
    pub fn add_lecture(&self, key: &TableKey, lecture: &Arc<Lecture>) -> Result<usize, PlannerError> {
        let added = lecture_entries(lecture);
        let count = added.len();
        self.write(key, move |current| {
            let mut next = current.to_vec();
            next.extend(added);
            next
        })?;
        info!(table = %key, lecture = %lecture.id, count, "Added lecture to timetable");
        Ok(count)
    }

    /// Replaces the entry at `index` with `update(latest entry)`.
    ///
    /// Returns the installed entry, or `None` (without notifying readers) if there is no
    /// entry at `index` or `update` declines.
    pub fn update_entry<F>(
        &self,
        key: &TableKey,
        index: usize,
        update: F,
    ) -> Result<Option<ScheduleEntry>, PlannerError>
    where
        F: FnOnce(&ScheduleEntry) -> Option<ScheduleEntry>,
    {
        let inner = upgrade(&self.inner)?;
        let installed = inner.modify(key, |current| {
            let replacement = update(current.get(index)?)?;
            let mut next = current.to_vec();
            next[index] = replacement;
            Some(next)
        })?;
        Ok(installed.map(|entries| entries[index].clone()))
    }

    /// Moves the entry at `index` to a new day and period range.
    ///
    /// Returns false, without notifying readers, if there is no entry at `index`.
    pub fn move_entry(
        &self,
        key: &TableKey,
        index: usize,
        day: Day,
        range: Vec<u8>,
    ) -> Result<bool, PlannerError> {
        let moved = self.update_entry(key, index, |target| {
            Some(ScheduleEntry {
                day,
                range,
                ..target.clone()
            })
        })?;
        if moved.is_some() {
            debug!(table = %key, index, day = %day, "Moved timetable entry");
        }
        Ok(moved.is_some())
    }

    /// Removes every entry that occupies `period` on `day`. Returns how many were removed.
    pub fn remove_entry(&self, key: &TableKey, day: Day, period: u8) -> Result<usize, PlannerError> {
        let inner = upgrade(&self.inner)?;
        let mut removed = 0;
        inner.modify(key, |current| {
            let next: Vec<ScheduleEntry> = current
                .iter()
                .filter(|e| !e.covers(day, period))
                .cloned()
                .collect();
            removed = current.len() - next.len();
            (removed > 0).then_some(next)
        })?;
        if removed > 0 {
            info!(table = %key, day = %day, period, removed, "Removed timetable entries");
        }
        Ok(removed)
    }
}
