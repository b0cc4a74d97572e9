use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::define_ordinal_type;

define_ordinal_type!(u32, DayNumber);
define_ordinal_type!(u32, SessionNumber);

impl DayNumber {
    /// Day numbering starts at 1.
    pub fn first() -> Self {
        DayNumber(1)
    }
}

impl SessionNumber {
    /// Session numbering starts at 0 and never resets within a schedule.
    pub fn first() -> Self {
        SessionNumber(0)
    }
}

/// How the hour budget was split across topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Hours proportional to topic importance.
    Proportional,
    /// Every topic scored zero, so the budget was split evenly.
    EqualWeightFallback,
}

/// Hours allocated per topic, in the order topics were scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAllocation {
    pub hours: IndexMap<String, f64>,
    pub mode: AllocationMode,
}

impl TopicAllocation {
    pub fn empty() -> Self {
        Self {
            hours: IndexMap::new(),
            mode: AllocationMode::Proportional,
        }
    }

    pub fn get(&self, topic: &str) -> Option<f64> {
        self.hours.get(topic).copied()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, f64> {
        self.hours.iter()
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Sum of allocated hours.
    pub fn total(&self) -> f64 {
        self.hours.values().sum()
    }
}

/// One block of study time on a single topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub topic: String,
    pub duration_minutes: u32,
    /// Mean importance of the covered questions (0.5 when none are assigned)
    pub importance_score: f64,
    /// Question texts, truncated for display
    pub questions_to_cover: Vec<String>,
    pub day: DayNumber,
    pub session_number: SessionNumber,
}

/// A complete day-by-day study plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub total_hours: f64,
    pub total_sessions: usize,
    pub sessions: Vec<StudySession>,
    /// topic -> hours allocated
    pub topic_distribution: IndexMap<String, f64>,
    pub start_date: Option<String>,
    pub exam_date: Option<String>,
}

impl Schedule {
    /// Number of distinct study days used.
    pub fn day_count(&self) -> u32 {
        self.sessions.iter().map(|s| s.day.value()).max().unwrap_or(0)
    }

    /// Study minutes placed on `day`.
    pub fn minutes_on_day(&self, day: DayNumber) -> u32 {
        self.sessions
            .iter()
            .filter(|s| s.day == day)
            .map(|s| s.duration_minutes)
            .sum()
    }

    pub fn sessions_for_topic<'a>(
        &'a self,
        topic: &'a str,
    ) -> impl Iterator<Item = &'a StudySession> + 'a {
        self.sessions.iter().filter(move |s| s.topic == topic)
    }
}
