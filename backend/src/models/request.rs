use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PlannerSettings;

/// Parameters for one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Total available study hours
    pub available_hours: f64,
    /// Study session duration in minutes
    #[serde(default = "default_study_duration", alias = "study_duration")]
    pub study_duration_minutes: u32,
    /// Break duration in minutes
    #[serde(default = "default_break_duration", alias = "break_duration")]
    pub break_duration_minutes: u32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    /// Optional allow-list of topic names, applied before allocation
    #[serde(default)]
    pub topics_to_include: Option<Vec<String>>,
}

fn default_study_duration() -> u32 {
    25
}

fn default_break_duration() -> u32 {
    5
}

impl PlanRequest {
    pub fn new(available_hours: f64) -> Self {
        Self {
            available_hours,
            study_duration_minutes: default_study_duration(),
            break_duration_minutes: default_break_duration(),
            start_date: None,
            exam_date: None,
            topics_to_include: None,
        }
    }

    /// Request using the configured session and break lengths.
    pub fn with_settings(available_hours: f64, settings: &PlannerSettings) -> Self {
        Self {
            study_duration_minutes: settings.study_duration_minutes,
            break_duration_minutes: settings.break_duration_minutes,
            ..Self::new(available_hours)
        }
    }

    pub fn with_study_duration(mut self, minutes: u32) -> Self {
        self.study_duration_minutes = minutes;
        self
    }

    pub fn with_break_duration(mut self, minutes: u32) -> Self {
        self.break_duration_minutes = minutes;
        self
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, exam: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.exam_date = exam;
        self
    }

    pub fn with_topics<S: Into<String>>(mut self, topics: impl IntoIterator<Item = S>) -> Self {
        self.topics_to_include = Some(topics.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let req: PlanRequest = serde_json::from_str(r#"{"available_hours": 12.5}"#).unwrap();
        assert_eq!(req.available_hours, 12.5);
        assert_eq!(req.study_duration_minutes, 25);
        assert_eq!(req.break_duration_minutes, 5);
        assert!(req.topics_to_include.is_none());
    }

    #[test]
    fn test_deserialize_short_field_names_and_dates() {
        let req: PlanRequest = serde_json::from_str(
            r#"{
                "available_hours": 8,
                "study_duration": 50,
                "break_duration": 10,
                "start_date": "2025-05-01",
                "exam_date": "2025-05-20",
                "topics_to_include": ["Algorithms"]
            }"#,
        )
        .unwrap();
        assert_eq!(req.study_duration_minutes, 50);
        assert_eq!(req.break_duration_minutes, 10);
        assert_eq!(req.start_date, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(req.topics_to_include, Some(vec!["Algorithms".to_string()]));
    }

    #[test]
    fn test_with_settings_uses_configured_lengths() {
        let settings = PlannerSettings {
            study_duration_minutes: 45,
            break_duration_minutes: 15,
            ..PlannerSettings::default()
        };
        let req = PlanRequest::with_settings(3.0, &settings);
        assert_eq!(req.study_duration_minutes, 45);
        assert_eq!(req.break_duration_minutes, 15);
    }
}
