use chrono::NaiveDate;

use crate::models::{Schedule, StudySession, TopicAllocation};
use crate::util::round_to;

/// Build the final [`Schedule`] from packed sessions.
///
/// `total_hours` is the packed study time (not the requested budget), rounded
/// to two decimals. Dates are rendered as ISO-8601 (`YYYY-MM-DD`).
pub fn assemble(
    sessions: Vec<StudySession>,
    allocation: &TopicAllocation,
    start_date: Option<NaiveDate>,
    exam_date: Option<NaiveDate>,
) -> Schedule {
    let total_minutes: u64 = sessions.iter().map(|s| s.duration_minutes as u64).sum();

    Schedule {
        total_hours: round_to(total_minutes as f64 / 60.0, 2),
        total_sessions: sessions.len(),
        sessions,
        topic_distribution: allocation.hours.clone(),
        start_date: start_date.map(|d| d.format("%Y-%m-%d").to_string()),
        exam_date: exam_date.map(|d| d.format("%Y-%m-%d").to_string()),
    }
}
