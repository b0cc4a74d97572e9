use std::collections::HashMap;

use super::{ImportanceScorer, QuestionSignals};
use crate::error::{ErrorContext, PlannerError, PlannerResult};
use crate::models::{importance_map, ImportanceMap, Question, TopicSet};
use crate::util::truncate_chars;

impl ImportanceScorer {
    /// Score every question of a corpus.
    ///
    /// # Arguments
    ///
    /// * `questions` - All questions, in upstream order
    /// * `topics` - Topic classification of those questions
    /// * `similar_groups` - Groups of near-duplicate questions, as indices into
    ///   `questions`, from the upstream similarity detector
    ///
    /// # Returns
    ///
    /// Question text → importance, in question order. A question's frequency
    /// is the summed size of the similarity groups it belongs to (1 when it
    /// belongs to none); it is scored against the largest grouped frequency.
    /// Topic membership is the first topic listing the question.
    ///
    /// Out-of-range indices in `similar_groups` are ignored and do not count
    /// towards the group size.
    pub fn score_corpus(
        &self,
        questions: &[Question],
        topics: &TopicSet,
        similar_groups: &[Vec<usize>],
    ) -> ImportanceMap {
        let mut frequency: HashMap<&str, u32> = HashMap::new();
        for group in similar_groups {
            let members: Vec<&Question> =
                group.iter().filter_map(|&idx| questions.get(idx)).collect();
            let size = members.len() as u32;
            for q in members {
                *frequency.entry(q.text.as_str()).or_insert(0) += size;
            }
        }
        let max_frequency = frequency.values().copied().max().unwrap_or(1);

        let current_year = self.current_year();
        let total_questions = questions.len();
        let topic_count = topics.len();

        // First listing wins, like `TopicSet::topic_of`.
        let mut topic_sizes: HashMap<&str, usize> = HashMap::new();
        for group in topics {
            for q in &group.questions {
                topic_sizes.entry(q.as_str()).or_insert(group.len());
            }
        }

        let mut scores = ImportanceMap::with_capacity(questions.len());
        for q in questions {
            let signals = QuestionSignals {
                frequency_count: frequency.get(q.text.as_str()).copied().unwrap_or(1),
                max_frequency,
                year: q.year,
                current_year,
                topic_question_count: topic_sizes.get(q.text.as_str()).copied(),
                total_questions,
                topic_count,
            };
            scores.insert(q.text.clone(), self.score(&signals));
        }

        log::debug!(
            "Scored {} questions ({} similarity groups, max frequency {})",
            scores.len(),
            similar_groups.len(),
            max_frequency
        );
        scores
    }

    /// Importance for every question: its own score where it carries one,
    /// [`score_corpus`](Self::score_corpus) (without similarity groups) for
    /// the rest.
    ///
    /// # Errors
    ///
    /// `InvalidInput` at stage `score` when a carried score is not a finite
    /// number in [0, 1].
    pub fn score_missing(
        &self,
        questions: &[Question],
        topics: &TopicSet,
    ) -> PlannerResult<ImportanceMap> {
        for q in questions {
            if let Some(score) = q.importance_score {
                if !(0.0..=1.0).contains(&score) {
                    return Err(PlannerError::invalid_input(format!(
                        "importance must be between 0 and 1, got {}",
                        score
                    ))
                    .with_context(
                        ErrorContext::new("score")
                            .with_topic(q.topic_or_default())
                            .with_details(truncate_chars(&q.text, 60)),
                    ));
                }
            }
        }

        let mut importance = importance_map(questions);
        let unscored = questions
            .iter()
            .filter(|q| !importance.contains_key(&q.text))
            .count();
        if unscored > 0 {
            log::debug!("Scoring {} questions without an importance", unscored);
            for (text, score) in self.score_corpus(questions, topics, &[]) {
                importance.entry(text).or_insert(score);
            }
        }
        Ok(importance)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ScoringSettings;
    use crate::error::PlannerError;
    use crate::models::{Question, TopicGroup, TopicSet};
    use crate::scoring::ImportanceScorer;

    fn scorer() -> ImportanceScorer {
        ImportanceScorer::new(ScoringSettings {
            current_year: Some(2025),
            ..ScoringSettings::default()
        })
    }

    fn topics(groups: Vec<(&str, Vec<&str>)>) -> TopicSet {
        groups
            .into_iter()
            .map(|(name, qs)| TopicGroup::new(name, qs.into_iter().map(String::from).collect()))
            .collect()
    }

    #[test]
    fn test_no_similarity_groups() {
        let questions = vec![Question::new("a"), Question::new("b")];
        let set = topics(vec![("T", vec!["a", "b"])]);
        let scores = scorer().score_corpus(&questions, &set, &[]);

        // freq 1/1, recency neutral, topic 2 / (2/1) = 1.0
        assert_eq!(scores["a"], 0.85);
        assert_eq!(scores["b"], 0.85);
    }

    #[test]
    fn test_repeated_questions_score_higher() {
        let questions = vec![
            Question::new("a").with_year(2025),
            Question::new("a'").with_year(2025),
            Question::new("b").with_year(2025),
        ];
        let set = topics(vec![("T", vec!["a", "a'", "b"])]);
        let scores = scorer().score_corpus(&questions, &set, &[vec![0, 1]]);

        // grouped: 2/2 = 1.0 ; ungrouped: 1/2 = 0.5
        assert_eq!(scores["a"], 1.0);
        assert_eq!(scores["a'"], 1.0);
        assert_eq!(scores["b"], 0.8);
    }

    #[test]
    fn test_question_outside_topics_gets_neutral_topic_signal() {
        let questions = vec![Question::new("a"), Question::new("orphan")];
        let set = topics(vec![("T", vec!["a"])]);
        let scores = scorer().score_corpus(&questions, &set, &[vec![0, 7]]);

        // index 7 does not exist, so the group has one member
        // "a": freq 1/1, topic min(1, 1 / 2) = 0.5
        assert_eq!(scores["a"], 0.7);
        // "orphan": freq 1/1, topic neutral
        assert_eq!(scores["orphan"], 0.7);
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["a", "orphan"]);
    }

    #[test]
    fn test_question_in_two_topics_uses_first_listing() {
        let questions = vec![Question::new("shared"), Question::new("x"), Question::new("y")];
        let set = topics(vec![("Small", vec!["shared"]), ("Big", vec!["shared", "x", "y"])]);
        let scores = scorer().score_corpus(&questions, &set, &[]);

        // "shared" sits in "Small": topic min(1, 1 / (3/2)) = 0.667
        // 0.4 + 0.15 + 0.3 x 0.667 = 0.75
        assert_eq!(scores["shared"], 0.75);
        // "x" sits in "Big": topic min(1, 3 / 1.5) = 1.0
        assert_eq!(scores["x"], 0.85);
    }

    #[test]
    fn test_score_missing_keeps_carried_scores() {
        let questions = vec![
            Question::new("a").with_importance(0.0),
            Question::new("b"),
            Question::new("c").with_importance(0.3),
        ];
        let set = topics(vec![("T", vec!["a", "b", "c"])]);
        let scores = scorer().score_missing(&questions, &set).unwrap();

        assert_eq!(scores.len(), 3);
        assert_eq!(scores["a"], 0.0);
        assert_eq!(scores["c"], 0.3);
        // freq 1/1, recency neutral, topic 3 / (3/1) = 1.0
        assert_eq!(scores["b"], 0.85);
    }

    #[test]
    fn test_score_missing_rejects_out_of_range() {
        let set = topics(vec![("T", vec!["a"])]);
        for bad in [7.5, -0.1, f64::NAN, f64::INFINITY] {
            let questions = vec![Question::new("a").with_topic("T").with_importance(bad)];
            let err = scorer().score_missing(&questions, &set).unwrap_err();

            assert!(matches!(err, PlannerError::InvalidInput { .. }), "{} accepted", bad);
            assert_eq!(err.context().stage.as_deref(), Some("score"));
            assert_eq!(err.context().topic.as_deref(), Some("T"));
        }
    }
}
