/// Types for catalog and timetable data
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A catalog lecture as served by the catalog sources.
///
/// Immutable once loaded; shared between the search view and timetables as `Arc<Lecture>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: String,
    pub title: String,
    /// Credit string, e.g. `"3"` or `"3(3)"`
    pub credits: String,
    pub grade: u8,
    pub major: String,
    /// Raw schedule string, e.g. `"월1,2"` or `"화3~4(C1001)<p>목3~4(C1001)"`
    #[serde(default)]
    pub schedule: String,
}

/// Day of the week shown on the timetable grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "월")]
    Mon,
    #[serde(rename = "화")]
    Tue,
    #[serde(rename = "수")]
    Wed,
    #[serde(rename = "목")]
    Thu,
    #[serde(rename = "금")]
    Fri,
    #[serde(rename = "토")]
    Sat,
}

impl Day {
    /// All grid days in column order.
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    /// Column index of this day on the grid.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Day> {
        Self::ALL.get(index).copied()
    }

    /// Parses the single-letter day label used in schedule strings.
    pub fn from_label(label: &str) -> Option<Day> {
        match label {
            "월" => Some(Day::Mon),
            "화" => Some(Day::Tue),
            "수" => Some(Day::Wed),
            "목" => Some(Day::Thu),
            "금" => Some(Day::Fri),
            "토" => Some(Day::Sat),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "월",
            Day::Tue => "화",
            Day::Wed => "수",
            Day::Thu => "목",
            Day::Fri => "금",
            Day::Sat => "토",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One placed block on a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub day: Day,
    /// Contiguous, ascending period numbers
    pub range: Vec<u8>,
    pub lecture: Arc<Lecture>,
    pub room: Option<String>,
}

impl ScheduleEntry {
    /// Returns true if this block occupies `period` on `day`.
    pub fn covers(&self, day: Day, period: u8) -> bool {
        self.day == day && self.range.contains(&period)
    }
}

/// Opaque identifier of a timetable.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableKey(String);

impl TableKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Content of a single timetable. A write always installs a new `Arc`.
pub type Schedules = Arc<Vec<ScheduleEntry>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lecture_deserializes_catalog_record() {
        let json = r#"{"id":"A","title":"Compilers","credits":"3","grade":1,"major":"CS","schedule":"월1,2"}"#;
        let lecture: Lecture = serde_json::from_str(json).unwrap();
        assert_eq!(lecture.id, "A");
        assert_eq!(lecture.grade, 1);
        assert_eq!(lecture.schedule, "월1,2");
    }

    #[test]
    fn test_day_labels_round_trip_through_index() {
        for day in Day::ALL {
            assert_eq!(Day::from_label(day.label()), Some(day));
            assert_eq!(Day::from_index(day.index()), Some(day));
        }
        assert_eq!(Day::from_index(6), None);
        assert_eq!(serde_json::to_string(&Day::Tue).unwrap(), "\"화\"");
    }
}
