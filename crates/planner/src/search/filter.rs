/// Pure filtering and paging functions over the lecture catalog
use super::criteria::FilterCriteria;
use crate::parser::parse_schedule;
use crate::types::Lecture;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Returns true if `lecture` satisfies every active constraint in `criteria`.
pub fn matches(lecture: &Lecture, criteria: &FilterCriteria) -> bool {
    let query = criteria.query.trim().to_lowercase();
    matches_query(lecture, &query) && matches_fields(lecture, criteria)
}

/// Ordered subsequence of `lectures` matching `criteria`.
pub fn filter_lectures(lectures: &[Arc<Lecture>], criteria: &FilterCriteria) -> Vec<Arc<Lecture>> {
    // Lowercase the query once rather than per lecture
    let query = criteria.query.trim().to_lowercase();
    lectures
        .iter()
        .filter(|l| matches_query(l, &query) && matches_fields(l, criteria))
        .cloned()
        .collect()
}

fn matches_query(lecture: &Lecture, query: &str) -> bool {
    query.is_empty()
        || lecture.title.to_lowercase().contains(query)
        || lecture.id.to_lowercase().contains(query)
}

fn matches_fields(lecture: &Lecture, criteria: &FilterCriteria) -> bool {
    if let Some(credits) = criteria.credits {
        if !lecture.credits.starts_with(&credits.to_string()) {
            return false;
        }
    }
    if !criteria.grades.is_empty() && !criteria.grades.contains(&lecture.grade) {
        return false;
    }
    if !criteria.majors.is_empty() && !criteria.majors.contains(&lecture.major) {
        return false;
    }
    if criteria.days.is_empty() && criteria.times.is_empty() {
        return true;
    }

    let placements = parse_schedule(&lecture.schedule);
    let day_ok = criteria.days.is_empty()
        || placements.iter().any(|p| criteria.days.contains(&p.day));
    let time_ok = criteria.times.is_empty()
        || placements
            .iter()
            .any(|p| p.range.iter().any(|t| criteria.times.contains(t)));
    day_ok && time_ok
}

/// Sorted, deduplicated majors appearing in the catalog.
pub fn distinct_majors(lectures: &[Arc<Lecture>]) -> Vec<String> {
    lectures
        .iter()
        .map(|l| l.major.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of pages needed to show `len` items.
pub fn last_page(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// Items visible once `page` pages have been revealed.
pub fn visible_prefix<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    let end = page.saturating_mul(page_size).min(items.len());
    items[..end].to_vec()
}
