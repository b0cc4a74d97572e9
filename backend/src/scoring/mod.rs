//! Question importance scoring.
//!
//! A question's importance blends three signals, each nominally in [0, 1]:
//!
//! - **frequency**: how often the question (or a near-duplicate) appeared,
//!   relative to the most repeated question
//! - **recency**: linear decay over a horizon of years since it last appeared
//! - **topic**: density of the question's topic relative to an even split
//!
//! ```text
//! importance = 0.4 × frequency + 0.3 × recency + 0.3 × topic
//! ```
//!
//! rounded to three decimals. Unknown recency or topic membership contribute
//! the neutral signal (0.5).
//!
//! Recency is floored at zero but not capped: a year later than the
//! reference year yields a recency above 1.0.

mod corpus;

use chrono::Datelike;

use crate::config::ScoringSettings;
use crate::util::round_to;

/// Raw inputs for scoring a single question.
///
/// Counts are expected to be non-negative and `frequency_count` to be at most
/// `max_frequency`; callers are responsible for both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionSignals {
    pub frequency_count: u32,
    pub max_frequency: u32,
    pub year: Option<i32>,
    pub current_year: i32,
    /// Size of the question's topic, `None` when it has no topic
    pub topic_question_count: Option<usize>,
    pub total_questions: usize,
    pub topic_count: usize,
}

/// Individual signal values before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalScores {
    pub frequency: f64,
    pub recency: f64,
    pub topic: f64,
}

/// Stateless importance scorer.
#[derive(Debug, Clone, Default)]
pub struct ImportanceScorer {
    settings: ScoringSettings,
}

impl ImportanceScorer {
    pub fn new(settings: ScoringSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    /// Reference year for recency: the configured year, else the current UTC year.
    pub fn current_year(&self) -> i32 {
        self.settings
            .current_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }

    /// Score one question.
    pub fn score(&self, signals: &QuestionSignals) -> f64 {
        let parts = self.signal_scores(signals);
        let s = &self.settings;
        round_to(
            s.frequency_weight * parts.frequency
                + s.recency_weight * parts.recency
                + s.topic_weight * parts.topic,
            3,
        )
    }

    /// Compute the unweighted signals for one question.
    pub fn signal_scores(&self, signals: &QuestionSignals) -> SignalScores {
        SignalScores {
            frequency: self.frequency_signal(signals.frequency_count, signals.max_frequency),
            recency: self.recency_signal(signals.year, signals.current_year),
            topic: self.topic_signal(
                signals.topic_question_count,
                signals.total_questions,
                signals.topic_count,
            ),
        }
    }

    fn frequency_signal(&self, count: u32, max_frequency: u32) -> f64 {
        count as f64 / max_frequency.max(1) as f64
    }

    fn recency_signal(&self, year: Option<i32>, current_year: i32) -> f64 {
        match year {
            None => self.settings.neutral_signal,
            Some(year) => {
                let horizon = self.settings.recency_horizon_years as f64;
                let age = (current_year - year) as f64;
                (1.0 - age / horizon).max(0.0)
            }
        }
    }

    fn topic_signal(
        &self,
        topic_question_count: Option<usize>,
        total_questions: usize,
        topic_count: usize,
    ) -> f64 {
        match topic_question_count {
            Some(count) if total_questions > 0 && topic_count > 0 => {
                let average = total_questions as f64 / topic_count as f64;
                (count as f64 / average).min(1.0)
            }
            _ => self.settings.neutral_signal,
        }
    }
}
