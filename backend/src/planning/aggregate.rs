use indexmap::IndexMap;

use crate::error::{ErrorContext, PlannerError, PlannerResult};
use crate::models::{ImportanceMap, TopicSet};
use crate::util::round_to;

/// Importance assumed for a question missing from the importance map.
pub const DEFAULT_QUESTION_IMPORTANCE: f64 = 0.5;

/// Topics with this many questions get the full question-count bonus.
const SATURATION_COUNT: f64 = 10.0;

const AVERAGE_WEIGHT: f64 = 0.7;
const COUNT_WEIGHT: f64 = 0.3;

/// Reduce each topic's question importances to one topic score.
///
/// ```text
/// combined = 0.7 × mean(importance) + 0.3 × min(1, count / 10)
/// ```
///
/// rounded to three decimals. An empty topic scores 0.0. The result keeps the
/// topic set's order.
///
/// # Errors
///
/// `InvalidInput` when a question's importance is NaN or infinite.
pub fn topic_importance(
    topics: &TopicSet,
    importance: &ImportanceMap,
) -> PlannerResult<IndexMap<String, f64>> {
    let mut result = IndexMap::with_capacity(topics.len());

    for group in topics {
        let scores = group
            .questions
            .iter()
            .map(|q| {
                let value = importance
                    .get(q)
                    .copied()
                    .unwrap_or(DEFAULT_QUESTION_IMPORTANCE);
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(PlannerError::invalid_input(format!(
                        "importance for question '{}' is not a finite number",
                        crate::util::truncate_chars(q, 40)
                    ))
                    .with_context(ErrorContext::new("aggregate").with_topic(&group.name)))
                }
            })
            .collect::<PlannerResult<Vec<f64>>>()?;

        result.insert(group.name.clone(), combine(&scores));
    }

    Ok(result)
}

/// Combine question importances into a topic score.
pub fn combine(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let count_weight = (scores.len() as f64 / SATURATION_COUNT).min(1.0);
    round_to(AVERAGE_WEIGHT * mean + COUNT_WEIGHT * count_weight, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TopicGroup;

    fn set(groups: Vec<(&str, Vec<&str>)>) -> TopicSet {
        groups
            .into_iter()
            .map(|(name, qs)| TopicGroup::new(name, qs.into_iter().map(String::from).collect()))
            .collect()
    }

    fn imp(pairs: &[(&str, f64)]) -> ImportanceMap {
        pairs.iter().map(|(q, v)| (q.to_string(), *v)).collect()
    }

    #[test]
    fn test_combine_empty_is_zero() {
        assert_eq!(combine(&[]), 0.0);
    }

    #[test]
    fn test_combine_saturates_at_ten_questions() {
        assert_eq!(combine(&[0.5; 10]), 0.65);
        assert_eq!(combine(&[0.5; 25]), 0.65);
        // 0.7 * 0.5 + 0.3 * 0.5
        assert_eq!(combine(&[0.5; 5]), 0.5);
    }

    #[test]
    fn test_scenario_topics() {
        let topics = set(vec![
            ("Algorithms", vec!["q1", "q2", "q3"]),
            ("Databases", vec!["q4"]),
        ]);
        let importance = imp(&[("q1", 0.9), ("q2", 0.8), ("q3", 0.7), ("q4", 0.5)]);

        let scores = topic_importance(&topics, &importance).unwrap();
        // 0.7 * 0.8 + 0.3 * 0.3
        assert_eq!(scores["Algorithms"], 0.65);
        // 0.7 * 0.5 + 0.3 * 0.1
        assert_eq!(scores["Databases"], 0.38);
        assert_eq!(
            scores.keys().collect::<Vec<_>>(),
            vec!["Algorithms", "Databases"]
        );
    }

    #[test]
    fn test_missing_importance_defaults_to_half() {
        let topics = set(vec![("T", vec!["unknown"])]);
        let scores = topic_importance(&topics, &ImportanceMap::new()).unwrap();
        // 0.7 * 0.5 + 0.3 * 0.1
        assert_eq!(scores["T"], 0.38);
    }

    #[test]
    fn test_empty_topic_scores_zero() {
        let topics = set(vec![("Empty", vec![])]);
        let scores = topic_importance(&topics, &ImportanceMap::new()).unwrap();
        assert_eq!(scores["Empty"], 0.0);
    }

    #[test]
    fn test_nan_importance_is_rejected_with_topic() {
        let topics = set(vec![("Broken", vec!["q"])]);
        let err = topic_importance(&topics, &imp(&[("q", f64::NAN)])).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.context().topic.as_deref(), Some("Broken"));
        assert_eq!(err.context().stage.as_deref(), Some("aggregate"));
    }
}
