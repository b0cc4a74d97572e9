//! Exam question records and the importance lookup built from them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Topic name used for questions without a label.
pub const DEFAULT_TOPIC: &str = "General";

/// Question text → importance score, in insertion order.
pub type ImportanceMap = IndexMap<String, f64>;

/// A question extracted upstream from an exam paper.
///
/// The question text is its identity throughout a planning run. Records are
/// read-only to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub topic: Option<String>,
    /// Precomputed importance in [0, 1]; `None` until scored
    #[serde(default, alias = "importance")]
    pub importance_score: Option<f64>,
    #[serde(default)]
    pub year: Option<i32>,
    /// How often the question (or a near-duplicate) appeared
    #[serde(default = "default_frequency")]
    pub frequency: u32,
}

fn default_frequency() -> u32 {
    1
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic: None,
            importance_score: None,
            year: None,
            frequency: 1,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance_score = Some(importance);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Topic label, falling back to [`DEFAULT_TOPIC`].
    pub fn topic_or_default(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_TOPIC)
    }
}

/// Build the importance lookup from question records, keeping the first
/// score seen for duplicated texts. Unscored records are left out.
pub fn importance_map(questions: &[Question]) -> ImportanceMap {
    let mut map = ImportanceMap::with_capacity(questions.len());
    for q in questions {
        if let Some(score) = q.importance_score {
            map.entry(q.text.clone()).or_insert(score);
        }
    }
    map
}
