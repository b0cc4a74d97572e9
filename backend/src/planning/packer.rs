//! Session packing: allocated topic hours into a day-by-day session list.

use indexmap::IndexMap;

use super::aggregate::DEFAULT_QUESTION_IMPORTANCE;
use crate::error::{ErrorContext, PlannerError, PlannerResult};
use crate::models::{DayNumber, ImportanceMap, SessionNumber, StudySession, TopicSet};
use crate::util::{round_to, truncate_chars};

/// Turns topic hour allocations into ordered study sessions.
///
/// Topics are visited from the largest allocation down. Each topic's time is
/// split evenly over `max(1, ⌊minutes / study_duration⌋)` sessions, so a
/// session may run longer than the nominal study duration. The topic's
/// questions, most important first, are cut into one contiguous chunk per
/// session, the last chunk taking the remainder.
///
/// Sessions fill days up to the daily cap, counted in unrounded minutes per
/// session. A session that would overflow the running day total starts the
/// next day, even when the current day is still empty, so a session longer
/// than the cap is never split and lands on a fresh day of its own.
#[derive(Debug, Clone)]
pub struct SessionPacker {
    max_daily_minutes: u32,
    excerpt_chars: usize,
}

impl Default for SessionPacker {
    fn default() -> Self {
        Self::new(240, 100)
    }
}

impl SessionPacker {
    pub fn new(max_daily_minutes: u32, excerpt_chars: usize) -> Self {
        Self {
            max_daily_minutes,
            excerpt_chars,
        }
    }

    /// Pack allocated hours into sessions.
    ///
    /// # Arguments
    ///
    /// * `topics` - Questions per topic, in clustering order
    /// * `topic_hours` - Hours allocated per topic; topics missing from
    ///   `topics` are skipped
    /// * `importance` - Question importance; missing questions rank last and
    ///   count as 0.5 in session averages
    /// * `study_duration` - Nominal session length in minutes
    /// * `break_duration` - Break length in minutes; does not affect day capacity
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a zero study duration, `Computation` when a topic's
    /// allocation is negative or not finite, or too large to express as
    /// `u32` session minutes and counts.
    pub fn pack(
        &self,
        topics: &TopicSet,
        topic_hours: &IndexMap<String, f64>,
        importance: &ImportanceMap,
        study_duration: u32,
        break_duration: u32,
    ) -> PlannerResult<Vec<StudySession>> {
        if study_duration == 0 {
            return Err(PlannerError::invalid_input("study duration must be at least 1 minute")
                .with_stage("pack"));
        }

        let mut order: Vec<(&str, f64)> = Vec::with_capacity(topic_hours.len());
        for (topic, &hours) in topic_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(PlannerError::computation(format!(
                    "allocated hours must be a non-negative number, got {}",
                    hours
                ))
                .with_context(ErrorContext::new("pack").with_topic(topic)));
            }
            order.push((topic.as_str(), hours));
        }
        // Stable: equal allocations keep the allocation order.
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        log::debug!(
            "Packing {} topics into {}-minute sessions ({}-minute breaks, {}-minute daily cap)",
            order.len(),
            study_duration,
            break_duration,
            self.max_daily_minutes
        );

        let mut sessions = Vec::new();
        let mut session_number = SessionNumber::first();
        let mut day = DayNumber::first();
        let mut daily_minutes = 0.0_f64;
        let cap = f64::from(self.max_daily_minutes);

        for (topic, hours) in order {
            let Some(group) = topics.get(topic) else {
                log::debug!("Skipping '{}': no questions for this topic", topic);
                continue;
            };

            let total_minutes = hours * 60.0;
            let num_sessions = (total_minutes / f64::from(study_duration)).floor().max(1.0);
            let minutes_per_session = total_minutes / num_sessions;
            let fits = num_sessions <= f64::from(u32::MAX)
                && minutes_per_session.round() <= f64::from(u32::MAX);
            if !fits {
                return Err(PlannerError::computation(format!(
                    "{:.2}h does not fit {}-minute sessions",
                    hours, study_duration
                ))
                .with_context(ErrorContext::new("pack").with_topic(topic)));
            }
            let num_sessions = num_sessions as usize;
            let duration = (minutes_per_session.round() as u32).max(1);

            let ranked = rank_questions(&group.questions, importance);
            for (start, end) in chunk_bounds(ranked.len(), num_sessions) {
                if daily_minutes + minutes_per_session > cap {
                    day = day.next();
                    daily_minutes = 0.0;
                }

                let covered = &ranked[start..end];
                sessions.push(StudySession {
                    topic: topic.to_string(),
                    duration_minutes: duration,
                    importance_score: session_importance(covered, importance),
                    questions_to_cover: covered
                        .iter()
                        .map(|q| truncate_chars(q, self.excerpt_chars))
                        .collect(),
                    day,
                    session_number,
                });

                session_number = session_number.next();
                daily_minutes += minutes_per_session;
            }

            log::debug!(
                "'{}': {:.2}h as {} x {} min over {} questions",
                topic,
                hours,
                num_sessions,
                duration,
                ranked.len()
            );
        }

        Ok(sessions)
    }
}

/// Questions ordered by importance, highest first; ties keep their order.
pub fn rank_questions<'a>(questions: &'a [String], importance: &ImportanceMap) -> Vec<&'a str> {
    let mut ranked: Vec<(&str, f64)> = questions
        .iter()
        .map(|q| (q.as_str(), importance.get(q).copied().unwrap_or(0.0)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().map(|(q, _)| q).collect()
}

/// `[start, end)` bounds of `sessions` contiguous chunks over `len` items.
///
/// Chunks hold `max(1, len / sessions)` items; the last chunk runs to the
/// end. When there are fewer items than sessions, trailing chunks are empty.
pub fn chunk_bounds(len: usize, sessions: usize) -> Vec<(usize, usize)> {
    let sessions = sessions.max(1);
    let size = (len / sessions).max(1);

    (0..sessions)
        .map(|i| {
            let start = (i * size).min(len);
            let end = if i + 1 < sessions {
                (start + size).min(len)
            } else {
                len
            };
            (start, end)
        })
        .collect()
}

fn session_importance(covered: &[&str], importance: &ImportanceMap) -> f64 {
    if covered.is_empty() {
        return DEFAULT_QUESTION_IMPORTANCE;
    }
    let sum: f64 = covered
        .iter()
        .map(|q| {
            importance
                .get(*q)
                .copied()
                .unwrap_or(DEFAULT_QUESTION_IMPORTANCE)
        })
        .sum();
    round_to(sum / covered.len() as f64, 3)
}

#[cfg(test)]
#[path = "packer_tests.rs"]
mod packer_tests;
