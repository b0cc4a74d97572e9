//! Study plan generation.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`aggregate::topic_importance`] reduces question importance to one score per topic
//! 2. [`TimeAllocator`] splits the hour budget across topics
//! 3. [`SessionPacker`] cuts each topic's time into sessions and places them on days
//! 4. [`assemble::assemble`] totals the sessions into a [`Schedule`]
//!
//! [`StudyPlanner`] validates the request and drives the stages. It holds only
//! configuration, so one planner can serve any number of threads.

pub mod aggregate;
pub mod allocate;
pub mod assemble;
pub mod packer;

pub use aggregate::{combine, topic_importance, DEFAULT_QUESTION_IMPORTANCE};
pub use allocate::TimeAllocator;
pub use assemble::assemble;
pub use packer::SessionPacker;

use serde::{Deserialize, Serialize};

use crate::classify::{classify_or_fallback, TopicClassifier};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{ImportanceMap, PlanRequest, Question, Schedule, TopicSet};
use crate::scoring::ImportanceScorer;

/// A question ranked by predicted importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedQuestion {
    pub question: String,
    pub importance_score: f64,
}

/// Stateless planning service built from configuration.
#[derive(Debug, Clone)]
pub struct StudyPlanner {
    scorer: ImportanceScorer,
    allocator: TimeAllocator,
    packer: SessionPacker,
    max_available_hours: f64,
}

impl Default for StudyPlanner {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

impl StudyPlanner {
    pub fn new(config: &PlannerConfig) -> Self {
        let p = &config.planner;
        Self {
            scorer: ImportanceScorer::new(config.scoring.clone()),
            allocator: TimeAllocator::new(p.min_topic_hours),
            packer: SessionPacker::new(p.max_daily_minutes, p.excerpt_chars),
            max_available_hours: p.max_available_hours,
        }
    }

    pub fn scorer(&self) -> &ImportanceScorer {
        &self.scorer
    }

    /// Check request parameters before any planning work.
    pub fn validate_request(&self, request: &PlanRequest) -> PlannerResult<()> {
        let fail = |msg: String| Err(PlannerError::invalid_input(msg).with_stage("validate_request"));

        let hours = request.available_hours;
        if !hours.is_finite() || hours <= 0.0 {
            return fail(format!("available_hours must be positive, got {}", hours));
        }
        if hours > self.max_available_hours {
            return fail(format!(
                "available_hours must be at most {}, got {}",
                self.max_available_hours, hours
            ));
        }
        if request.study_duration_minutes == 0 {
            return fail("study_duration_minutes must be at least 1".to_string());
        }
        if let (Some(start), Some(exam)) = (request.start_date, request.exam_date) {
            if exam < start {
                return fail(format!(
                    "exam_date {} is before start_date {}",
                    exam, start
                ));
            }
        }
        Ok(())
    }

    /// Generate a schedule for already classified and scored questions.
    ///
    /// # Arguments
    ///
    /// * `topics` - Questions per topic, in clustering order
    /// * `importance` - Question importance; missing questions count as 0.5
    /// * `request` - Budget, session lengths, dates and topic allow-list
    ///
    /// # Errors
    ///
    /// `InvalidInput` for rejected request parameters or when no topic is left
    /// after applying `topics_to_include`.
    pub fn generate_schedule(
        &self,
        topics: &TopicSet,
        importance: &ImportanceMap,
        request: &PlanRequest,
    ) -> PlannerResult<Schedule> {
        self.validate_request(request)?;

        let filtered;
        let topics = match &request.topics_to_include {
            Some(allow) => {
                filtered = topics.retain_named(allow.as_slice());
                &filtered
            }
            None => topics,
        };
        if topics.is_empty() {
            return Err(
                PlannerError::invalid_input("No topics found matching criteria")
                    .with_stage("generate_schedule"),
            );
        }

        let scores = topic_importance(topics, importance)?;
        let allocation = self.allocator.allocate(&scores, request.available_hours)?;
        for (topic, hours) in allocation.iter() {
            log::debug!("Allocated {:.2}h to '{}'", hours, topic);
        }

        let sessions = self.packer.pack(
            topics,
            &allocation.hours,
            importance,
            request.study_duration_minutes,
            request.break_duration_minutes,
        )?;
        let schedule = assemble(sessions, &allocation, request.start_date, request.exam_date);

        log::info!(
            "Generated schedule: {} sessions over {} days for {} topics ({:.2}h)",
            schedule.total_sessions,
            schedule.day_count(),
            allocation.len(),
            schedule.total_hours
        );
        Ok(schedule)
    }

    /// Classify raw questions, then generate a schedule.
    ///
    /// Questions keep the importance they carry; unscored ones are scored
    /// from the corpus. A failing classifier does not fail the plan; all
    /// questions go under the default topic instead.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty corpus, a rejected request, or a carried
    /// importance outside [0, 1].
    pub fn plan(
        &self,
        questions: &[Question],
        classifier: &dyn TopicClassifier,
        request: &PlanRequest,
    ) -> PlannerResult<Schedule> {
        if questions.is_empty() {
            return Err(PlannerError::invalid_input("No questions to plan for").with_stage("plan"));
        }
        self.validate_request(request)?;

        let topics = classify_or_fallback(classifier, questions).into_topics();
        let importance = self.scorer.score_missing(questions, &topics)?;
        self.generate_schedule(&topics, &importance, request)
    }

    /// The `top_n` questions by importance, highest first.
    ///
    /// Ties keep input order; questions missing from `importance` score 0.0.
    pub fn predict_important_questions<S: AsRef<str>>(
        &self,
        questions: &[S],
        importance: &ImportanceMap,
        top_n: usize,
    ) -> Vec<PredictedQuestion> {
        predict_important_questions(questions, importance, top_n)
    }
}

/// Free-standing form of [`StudyPlanner::predict_important_questions`].
pub fn predict_important_questions<S: AsRef<str>>(
    questions: &[S],
    importance: &ImportanceMap,
    top_n: usize,
) -> Vec<PredictedQuestion> {
    let mut ranked: Vec<PredictedQuestion> = questions
        .iter()
        .map(|q| PredictedQuestion {
            question: q.as_ref().to_string(),
            importance_score: importance.get(q.as_ref()).copied().unwrap_or(0.0),
        })
        .collect();
    ranked.sort_by(|a, b| b.importance_score.total_cmp(&a.importance_score));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::classify::LabelClassifier;
    use crate::models::TopicGroup;

    fn scenario() -> (TopicSet, ImportanceMap) {
        let topics: TopicSet = [
            TopicGroup::new(
                "Algorithms",
                vec!["q1".into(), "q2".into(), "q3".into()],
            ),
            TopicGroup::new("Databases", vec!["q4".into()]),
        ]
        .into_iter()
        .collect();
        let importance: ImportanceMap = [("q1", 0.9), ("q2", 0.8), ("q3", 0.7), ("q4", 0.5)]
            .into_iter()
            .map(|(q, v)| (q.to_string(), v))
            .collect();
        (topics, importance)
    }

    #[test]
    fn test_planner_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StudyPlanner>();
    }

    #[test]
    fn test_validate_request() {
        let planner = StudyPlanner::default();
        assert!(planner.validate_request(&PlanRequest::new(5.0)).is_ok());
        assert!(planner.validate_request(&PlanRequest::new(1000.0)).is_ok());

        for hours in [0.0, -1.0, f64::NAN, 1000.5] {
            let err = planner.validate_request(&PlanRequest::new(hours)).unwrap_err();
            assert!(err.is_invalid_input(), "{} accepted", hours);
            assert_eq!(err.context().stage.as_deref(), Some("validate_request"));
        }

        let zero_study = PlanRequest::new(5.0).with_study_duration(0);
        assert!(planner.validate_request(&zero_study).is_err());

        let backwards = PlanRequest::new(5.0).with_dates(
            NaiveDate::from_ymd_opt(2025, 6, 10),
            NaiveDate::from_ymd_opt(2025, 6, 1),
        );
        assert!(planner.validate_request(&backwards).is_err());
    }

    #[test]
    fn test_scenario_schedule() {
        let (topics, importance) = scenario();
        let schedule = StudyPlanner::default()
            .generate_schedule(&topics, &importance, &PlanRequest::new(5.0))
            .unwrap();

        let dist = &schedule.topic_distribution;
        assert!(dist["Algorithms"] > dist["Databases"]);
        assert!((dist.values().sum::<f64>() - 5.0).abs() < 1e-9);
        assert_eq!(schedule.total_sessions, schedule.sessions.len());
        assert_eq!(schedule.sessions[0].topic, "Algorithms");
    }

    #[test]
    fn test_allow_list_filters_topics() {
        let (topics, importance) = scenario();
        let request = PlanRequest::new(2.0).with_topics(["Databases"]);
        let schedule = StudyPlanner::default()
            .generate_schedule(&topics, &importance, &request)
            .unwrap();

        assert_eq!(
            schedule.topic_distribution.keys().collect::<Vec<_>>(),
            vec!["Databases"]
        );
        assert!(schedule.sessions.iter().all(|s| s.topic == "Databases"));
    }

    #[test]
    fn test_allow_list_matching_nothing_is_rejected() {
        let (topics, importance) = scenario();
        let request = PlanRequest::new(2.0).with_topics(["Physics"]);
        let err = StudyPlanner::default()
            .generate_schedule(&topics, &importance, &request)
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("No topics found matching criteria"));
    }

    #[test]
    fn test_plan_from_questions() {
        let questions = vec![
            Question::new("Explain quicksort").with_topic("Algorithms").with_importance(0.9),
            Question::new("Define 3NF").with_topic("Databases").with_importance(0.4),
        ];
        let schedule = StudyPlanner::default()
            .plan(&questions, &LabelClassifier, &PlanRequest::new(3.0))
            .unwrap();
        assert_eq!(schedule.topic_distribution.len(), 2);

        let err = StudyPlanner::default()
            .plan(&[], &LabelClassifier, &PlanRequest::new(3.0))
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_plan_scores_unscored_questions() {
        let questions = vec![
            Question::new("q1").with_topic("Algorithms").with_year(2024),
            Question::new("q2").with_topic("Algorithms"),
            Question::new("q3").with_topic("Databases").with_importance(0.0),
        ];
        let schedule = StudyPlanner::default()
            .plan(&questions, &LabelClassifier, &PlanRequest::new(2.0))
            .unwrap();

        let algorithms: Vec<_> = schedule.sessions_for_topic("Algorithms").collect();
        assert!(algorithms[0].importance_score > 0.0);
        let databases: Vec<_> = schedule.sessions_for_topic("Databases").collect();
        assert_eq!(databases[0].importance_score, 0.0);
    }

    #[test]
    fn test_plan_rejects_out_of_range_importance() {
        let questions = vec![
            Question::new("a").with_topic("A").with_importance(7.5),
            Question::new("b").with_topic("B").with_importance(0.5),
        ];
        let err = StudyPlanner::default()
            .plan(&questions, &LabelClassifier, &PlanRequest::new(5.0))
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.context().stage.as_deref(), Some("score"));
    }

    #[test]
    fn test_predict_with_non_finite_scores() {
        let importance: ImportanceMap = [("a", f64::NAN), ("b", 0.2), ("c", 0.7)]
            .into_iter()
            .map(|(q, v)| (q.to_string(), v))
            .collect();
        let predicted = predict_important_questions(&["a", "b", "c"], &importance, 3);

        let finite: Vec<&str> = predicted
            .iter()
            .map(|p| p.question.as_str())
            .filter(|q| *q != "a")
            .collect();
        assert_eq!(finite, vec!["c", "b"]);
    }

    #[test]
    fn test_predict_important_questions() {
        let (_, importance) = scenario();
        let predicted =
            predict_important_questions(&["q3", "q1", "q4", "q2"], &importance, 2);
        let names: Vec<&str> = predicted.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(names, vec!["q1", "q2"]);
        assert_eq!(predicted[0].importance_score, 0.9);
    }

    #[test]
    fn test_predict_ties_and_missing() {
        let importance: ImportanceMap = [("a".to_string(), 0.5), ("b".to_string(), 0.5)]
            .into_iter()
            .collect();
        let predicted = StudyPlanner::default().predict_important_questions(
            &["x", "b", "a"],
            &importance,
            10,
        );
        let names: Vec<&str> = predicted.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "x"]);
        assert_eq!(predicted[2].importance_score, 0.0);
    }
}
