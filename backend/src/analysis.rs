//! Corpus-level question analytics.
//!
//! Summarizes a classified corpus: how many questions each topic holds, how
//! important each topic is on average, and which questions are most likely
//! to come up again.

use serde::{Deserialize, Serialize};

use crate::models::{ImportanceMap, Question, TopicSet};
use crate::planning::{predict_important_questions, PredictedQuestion};
use crate::util::round_to;

/// Questions shown per topic.
const PREVIEW_LEN: usize = 5;

/// Topics listed as important.
const IMPORTANT_TOPICS_LEN: usize = 5;

/// Summary of one topic.
///
/// # Fields
///
/// * `topic` - Topic name
/// * `question_count` - Number of questions in the topic
/// * `importance_score` - Mean question importance, 3 decimals; questions
///   without a score count as 0.0
/// * `questions` - The first questions of the topic, in clustering order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub topic: String,
    pub question_count: usize,
    pub importance_score: f64,
    pub questions: Vec<String>,
}

/// Analysis of a whole question corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_questions: usize,
    /// Topics by importance, highest first
    pub topics: Vec<TopicAnalysis>,
    /// Names of the most important topics
    pub important_topics: Vec<String>,
    pub predictions: Vec<PredictedQuestion>,
}

impl AnalysisReport {
    pub fn empty() -> Self {
        Self {
            total_questions: 0,
            topics: Vec::new(),
            important_topics: Vec::new(),
            predictions: Vec::new(),
        }
    }
}

/// Analyze a classified corpus.
///
/// # Arguments
///
/// * `questions` - All questions, in upstream order
/// * `topics` - Classification of those questions
/// * `importance` - Question importance scores
/// * `top_n` - Number of predicted questions to return
///
/// Topics with equal importance keep their classification order.
pub fn analyze(
    questions: &[Question],
    topics: &TopicSet,
    importance: &ImportanceMap,
    top_n: usize,
) -> AnalysisReport {
    if questions.is_empty() {
        return AnalysisReport::empty();
    }

    let mut analyses: Vec<TopicAnalysis> = topics
        .iter()
        .map(|group| {
            let average = if group.is_empty() {
                0.0
            } else {
                group
                    .questions
                    .iter()
                    .map(|q| importance.get(q).copied().unwrap_or(0.0))
                    .sum::<f64>()
                    / group.len() as f64
            };
            TopicAnalysis {
                topic: group.name.clone(),
                question_count: group.len(),
                importance_score: round_to(average, 3),
                questions: group.questions.iter().take(PREVIEW_LEN).cloned().collect(),
            }
        })
        .collect();
    analyses.sort_by(|a, b| b.importance_score.total_cmp(&a.importance_score));

    let important_topics = analyses
        .iter()
        .take(IMPORTANT_TOPICS_LEN)
        .map(|t| t.topic.clone())
        .collect();

    let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
    let predictions = predict_important_questions(&texts, importance, top_n);

    log::debug!(
        "Analyzed {} questions across {} topics",
        questions.len(),
        analyses.len()
    );

    AnalysisReport {
        total_questions: questions.len(),
        topics: analyses,
        important_topics,
        predictions,
    }
}
