use crate::types::Day;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Search filters applied to the lecture catalog.
///
/// Every set-valued field treats the empty set as "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title or id
    pub query: String,
    /// Credit count the lecture's credit string must start with
    pub credits: Option<u8>,
    pub grades: BTreeSet<u8>,
    pub days: BTreeSet<Day>,
    pub times: BTreeSet<u8>,
    pub majors: BTreeSet<String>,
}

impl FilterCriteria {
    /// Returns true if no field constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.query.trim().is_empty()
            && self.credits.is_none()
            && self.grades.is_empty()
            && self.days.is_empty()
            && self.times.is_empty()
            && self.majors.is_empty()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_credits(mut self, credits: u8) -> Self {
        self.credits = Some(credits);
        self
    }

    pub fn with_grade(mut self, grade: u8) -> Self {
        self.grades.insert(grade);
        self
    }

    pub fn with_day(mut self, day: Day) -> Self {
        self.days.insert(day);
        self
    }

    pub fn with_time(mut self, period: u8) -> Self {
        self.times.insert(period);
        self
    }

    pub fn with_major(mut self, major: impl Into<String>) -> Self {
        self.majors.insert(major.into());
        self
    }
}

/// Adds `value` if absent, removes it if present. Returns the new inclusion state.
pub fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconstrained() {
        assert!(FilterCriteria::default().is_unconstrained());
        assert!(FilterCriteria::default().with_query("  ").is_unconstrained());
        assert!(!FilterCriteria::default().with_day(Day::Mon).is_unconstrained());
    }

    #[test]
    fn test_toggle() {
        let mut set = BTreeSet::new();
        assert!(toggle(&mut set, 3));
        assert!(!toggle(&mut set, 3));
        assert!(set.is_empty());
    }
}
