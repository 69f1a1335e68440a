//! Parsing of raw lecture schedule strings into timetable placements.
//!
//! A schedule string holds one or more placements separated by `<p>`. Each placement is a
//! day letter, a period list and an optional room in parentheses:
//! - `월1,2`
//! - `화3~5(C1001)`
//! - `수1~2(A101)<p>금4,5(A101)`

use crate::types::{Day, Lecture, ScheduleEntry};
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// A single day/period placement parsed out of a schedule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub day: Day,
    pub range: Vec<u8>,
    pub room: Option<String>,
}

const SEGMENT_SEPARATOR: &str = "<p>";

// Compiled once
static PLACEMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<day>[월화수목금토일])\s*(?P<periods>[0-9][0-9,~\s]*)(?:\((?P<room>[^)]*)\))?")
        .unwrap()
});

/// Parses a raw schedule string.
///
/// Segments that do not describe a grid day with at least one period are skipped rather
/// than reported; the catalog is the source of truth for its own format.
pub fn parse_schedule(raw: &str) -> Vec<Placement> {
    raw.split(SEGMENT_SEPARATOR)
        .filter_map(parse_segment)
        .collect()
}

/// Expands a lecture into timetable entries, one per placement.
pub fn lecture_entries(lecture: &Arc<Lecture>) -> Vec<ScheduleEntry> {
    parse_schedule(&lecture.schedule)
        .into_iter()
        .map(|p| ScheduleEntry {
            day: p.day,
            range: p.range,
            lecture: Arc::clone(lecture),
            room: p.room,
        })
        .collect()
}

fn parse_segment(segment: &str) -> Option<Placement> {
    let caps = PLACEMENT_REGEX.captures(segment)?;
    // Sunday has no grid column
    let day = Day::from_label(caps.name("day")?.as_str())?;
    let range = parse_periods(caps.name("periods")?.as_str());
    if range.is_empty() {
        return None;
    }

    let room = caps
        .name("room")
        .map(|m| m.as_str().trim().to_string())
        .filter(|r| !r.is_empty());

    Some(Placement { day, range, room })
}

/// Expands `1,2`, `3~5` and mixes of both into a sorted, deduplicated period list.
fn parse_periods(text: &str) -> Vec<u8> {
    let mut periods = Vec::new();

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('~') {
            Some((start, end)) => {
                if let (Ok(start), Ok(end)) = (start.trim().parse::<u8>(), end.trim().parse::<u8>()) {
                    if start <= end {
                        periods.extend(start..=end);
                    }
                }
            }
            None => {
                if let Ok(period) = token.parse::<u8>() {
                    periods.push(period);
                }
            }
        }
    }

    periods.sort_unstable();
    periods.dedup();
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_list() {
        let parsed = parse_schedule("월1,2");
        assert_eq!(
            parsed,
            vec![Placement {
                day: Day::Mon,
                range: vec![1, 2],
                room: None
            }]
        );
    }

    #[test]
    fn test_parse_range_with_room() {
        let parsed = parse_schedule("화3~5(C1001)");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].day, Day::Tue);
        assert_eq!(parsed[0].range, vec![3, 4, 5]);
        assert_eq!(parsed[0].room.as_deref(), Some("C1001"));
    }

    #[test]
    fn test_parse_multiple_segments() {
        let parsed = parse_schedule("수1~2(A101)<p>금4,5(A101)");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].day, Day::Fri);
        assert_eq!(parsed[1].range, vec![4, 5]);
    }

    #[test]
    fn test_parse_skips_unplaceable_segments() {
        assert!(parse_schedule("").is_empty());
        assert!(parse_schedule("일1,2").is_empty());
        assert!(parse_schedule("온라인").is_empty());
        assert_eq!(parse_schedule("온라인<p>목7").len(), 1);
    }

    #[test]
    fn test_lecture_entries_share_lecture() {
        let lecture = Arc::new(Lecture {
            id: "A".into(),
            title: "Compilers".into(),
            credits: "3".into(),
            grade: 3,
            major: "CS".into(),
            schedule: "월1,2<p>수1,2".into(),
        });
        let entries = lecture_entries(&lecture);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| Arc::ptr_eq(&e.lecture, &lecture)));
    }
}
