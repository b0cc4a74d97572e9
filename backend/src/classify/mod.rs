//! Topic classification: grouping questions into named topics.
//!
//! Clustering itself happens upstream; the planner consumes it through the
//! [`TopicClassifier`] trait. When a classifier fails the planner does not
//! guess: every question is placed under the default topic and the result is
//! marked as [`Classification::FallbackSingleTopic`].

mod keywords;

pub use keywords::{KeywordClassifier, UNNAMED_TOPIC};

use crate::error::PlannerResult;
use crate::models::{Question, TopicSet, DEFAULT_TOPIC};

/// Groups questions into topics.
pub trait TopicClassifier: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &str;

    fn classify(&self, questions: &[Question]) -> PlannerResult<TopicSet>;
}

/// Uses each question's own topic label, [`DEFAULT_TOPIC`] when unlabeled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelClassifier;

impl TopicClassifier for LabelClassifier {
    fn name(&self) -> &str {
        "labels"
    }

    fn classify(&self, questions: &[Question]) -> PlannerResult<TopicSet> {
        let mut topics = TopicSet::new();
        for q in questions {
            topics.insert_question(q.topic_or_default(), q.text.clone());
        }
        Ok(topics)
    }
}

/// Outcome of classification, distinguishing the fallback policy from a
/// genuine classifier result.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Classified(TopicSet),
    /// Every question under [`DEFAULT_TOPIC`], with the reason classification
    /// was abandoned.
    FallbackSingleTopic { topics: TopicSet, reason: String },
}

impl Classification {
    pub fn topics(&self) -> &TopicSet {
        match self {
            Self::Classified(topics) | Self::FallbackSingleTopic { topics, .. } => topics,
        }
    }

    pub fn into_topics(self) -> TopicSet {
        match self {
            Self::Classified(topics) | Self::FallbackSingleTopic { topics, .. } => topics,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FallbackSingleTopic { .. })
    }
}

/// Run `classifier`, falling back to a single topic when it fails or returns
/// nothing for a non-empty corpus.
pub fn classify_or_fallback(
    classifier: &dyn TopicClassifier,
    questions: &[Question],
) -> Classification {
    let reason = match classifier.classify(questions) {
        Ok(topics) if !topics.is_empty() || questions.is_empty() => {
            log::debug!(
                "Classifier '{}' produced {} topics",
                classifier.name(),
                topics.len()
            );
            return Classification::Classified(topics);
        }
        Ok(_) => "classifier returned no topics".to_string(),
        Err(e) => e.to_string(),
    };

    log::warn!(
        "Classifier '{}' failed ({}), placing {} questions under '{}'",
        classifier.name(),
        reason,
        questions.len(),
        DEFAULT_TOPIC
    );
    Classification::FallbackSingleTopic {
        topics: single_topic(questions),
        reason,
    }
}

fn single_topic(questions: &[Question]) -> TopicSet {
    let mut topics = TopicSet::new();
    for q in questions {
        topics.insert_question(DEFAULT_TOPIC, q.text.clone());
    }
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    struct Failing;

    impl TopicClassifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn classify(&self, _questions: &[Question]) -> PlannerResult<TopicSet> {
            Err(PlannerError::classification("embedding service unavailable"))
        }
    }

    struct Empty;

    impl TopicClassifier for Empty {
        fn name(&self) -> &str {
            "empty"
        }

        fn classify(&self, _questions: &[Question]) -> PlannerResult<TopicSet> {
            Ok(TopicSet::new())
        }
    }

    fn corpus() -> Vec<Question> {
        vec![
            Question::new("q1").with_topic("Algorithms"),
            Question::new("q2"),
            Question::new("q3").with_topic("Algorithms"),
        ]
    }

    #[test]
    fn test_label_classifier_groups_by_label() {
        let topics = LabelClassifier.classify(&corpus()).unwrap();
        assert_eq!(topics.names().collect::<Vec<_>>(), vec!["Algorithms", "General"]);
        assert_eq!(topics.get("Algorithms").unwrap().questions, vec!["q1", "q3"]);
    }

    #[test]
    fn test_success_is_classified() {
        let result = classify_or_fallback(&LabelClassifier, &corpus());
        assert!(!result.is_fallback());
        assert_eq!(result.topics().len(), 2);
    }

    #[test]
    fn test_failure_falls_back_to_single_topic() {
        let result = classify_or_fallback(&Failing, &corpus());
        assert!(result.is_fallback());
        match &result {
            Classification::FallbackSingleTopic { reason, .. } => {
                assert!(reason.contains("embedding service unavailable"))
            }
            other => panic!("unexpected {:?}", other),
        }

        let topics = result.into_topics();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics.get("General").unwrap().questions, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_empty_result_falls_back() {
        assert!(classify_or_fallback(&Empty, &corpus()).is_fallback());
        assert!(!classify_or_fallback(&Empty, &[]).is_fallback());
    }
}
