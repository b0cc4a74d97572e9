//! Planner configuration file and environment variable support.
//!
//! Configuration is read from a `planner.toml` file when one exists and then
//! overridden by `PLANNER_*` environment variables. Every field has a default,
//! so an absent file yields the standard planning policy.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ErrorContext, PlannerError, PlannerResult};

/// Planner configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub planner: PlannerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
}

/// Time allocation and session packing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Nominal study session length in minutes
    #[serde(default = "default_study_duration")]
    pub study_duration_minutes: u32,
    /// Break length in minutes (carried through, not used in day capacity)
    #[serde(default = "default_break_duration")]
    pub break_duration_minutes: u32,
    /// Maximum study minutes placed on a single day
    #[serde(default = "default_max_daily_minutes")]
    pub max_daily_minutes: u32,
    /// Hours guaranteed per topic when the budget covers every topic
    #[serde(default = "default_min_topic_hours")]
    pub min_topic_hours: f64,
    /// Upper bound on the requested study budget
    #[serde(default = "default_max_available_hours")]
    pub max_available_hours: f64,
    /// Characters kept from each question in a session
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

/// Importance scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f64,
    #[serde(default = "default_recency_weight")]
    pub recency_weight: f64,
    #[serde(default = "default_topic_weight")]
    pub topic_weight: f64,
    /// Years over which recency decays linearly to zero
    #[serde(default = "default_recency_horizon_years")]
    pub recency_horizon_years: u32,
    /// Signal value used when recency or topic membership is unknown
    #[serde(default = "default_neutral_signal")]
    pub neutral_signal: f64,
    /// Reference year for recency; the current UTC year when unset
    #[serde(default)]
    pub current_year: Option<i32>,
}

fn default_study_duration() -> u32 {
    25
}

fn default_break_duration() -> u32 {
    5
}

fn default_max_daily_minutes() -> u32 {
    240
}

fn default_min_topic_hours() -> f64 {
    0.5
}

fn default_max_available_hours() -> f64 {
    1000.0
}

fn default_excerpt_chars() -> usize {
    100
}

fn default_frequency_weight() -> f64 {
    0.4
}

fn default_recency_weight() -> f64 {
    0.3
}

fn default_topic_weight() -> f64 {
    0.3
}

fn default_recency_horizon_years() -> u32 {
    10
}

fn default_neutral_signal() -> f64 {
    0.5
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            study_duration_minutes: default_study_duration(),
            break_duration_minutes: default_break_duration(),
            max_daily_minutes: default_max_daily_minutes(),
            min_topic_hours: default_min_topic_hours(),
            max_available_hours: default_max_available_hours(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            frequency_weight: default_frequency_weight(),
            recency_weight: default_recency_weight(),
            topic_weight: default_topic_weight(),
            recency_horizon_years: default_recency_horizon_years(),
            neutral_signal: default_neutral_signal(),
            current_year: None,
        }
    }
}

impl PlannerConfig {
    /// Load planner configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(PlannerConfig)` if the file was read, parsed and validated
    /// * `Err(PlannerError::Configuration)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PlannerError::configuration(format!("Failed to read config file: {}", e)).with_context(
                ErrorContext::new("load_config").with_details(path.display().to_string()),
            )
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> PlannerResult<Self> {
        let config: PlannerConfig = toml::from_str(content).map_err(|e| {
            PlannerError::configuration(format!("Failed to parse config file: {}", e))
                .with_stage("load_config")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load planner configuration from the default location.
    ///
    /// Searches for `planner.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> PlannerResult<Self> {
        match find_default_config() {
            Some(path) => Self::from_file(&path),
            None => Err(PlannerError::configuration(
                "No planner.toml found in standard locations",
            )),
        }
    }

    /// Resolve the effective configuration: the default-location file when
    /// present (defaults otherwise), then environment overrides.
    ///
    /// # Environment Variables
    /// - `PLANNER_STUDY_DURATION`: session length in minutes
    /// - `PLANNER_BREAK_DURATION`: break length in minutes
    /// - `PLANNER_MAX_DAILY_MINUTES`: daily study cap in minutes
    /// - `PLANNER_MAX_AVAILABLE_HOURS`: largest accepted study budget
    /// - `PLANNER_CURRENT_YEAR`: reference year for recency scoring
    pub fn load() -> PlannerResult<Self> {
        let mut config = match find_default_config() {
            Some(path) => Self::from_file(&path)?,
            None => {
                log::debug!("No planner.toml found, using default configuration");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `PLANNER_*` environment variable overrides in place.
    pub fn apply_env_overrides(&mut self) -> PlannerResult<()> {
        if let Some(v) = env_parse::<u32>("PLANNER_STUDY_DURATION")? {
            self.planner.study_duration_minutes = v;
        }
        if let Some(v) = env_parse::<u32>("PLANNER_BREAK_DURATION")? {
            self.planner.break_duration_minutes = v;
        }
        if let Some(v) = env_parse::<u32>("PLANNER_MAX_DAILY_MINUTES")? {
            self.planner.max_daily_minutes = v;
        }
        if let Some(v) = env_parse::<f64>("PLANNER_MAX_AVAILABLE_HOURS")? {
            self.planner.max_available_hours = v;
        }
        if let Some(v) = env_parse::<i32>("PLANNER_CURRENT_YEAR")? {
            self.scoring.current_year = Some(v);
        }
        self.validate()
    }

    /// Reject settings the planning pipeline cannot work with.
    pub fn validate(&self) -> PlannerResult<()> {
        let fail = |msg: String| {
            Err(PlannerError::configuration(msg).with_stage("validate_config"))
        };

        let p = &self.planner;
        if p.study_duration_minutes == 0 {
            return fail("study_duration_minutes must be at least 1".to_string());
        }
        if p.max_daily_minutes == 0 {
            return fail("max_daily_minutes must be at least 1".to_string());
        }
        if !p.min_topic_hours.is_finite() || p.min_topic_hours < 0.0 {
            return fail(format!(
                "min_topic_hours must be a non-negative number, got {}",
                p.min_topic_hours
            ));
        }
        if !p.max_available_hours.is_finite() || p.max_available_hours <= 0.0 {
            return fail(format!(
                "max_available_hours must be positive, got {}",
                p.max_available_hours
            ));
        }
        if p.excerpt_chars == 0 {
            return fail("excerpt_chars must be at least 1".to_string());
        }

        let s = &self.scoring;
        for (name, w) in [
            ("frequency_weight", s.frequency_weight),
            ("recency_weight", s.recency_weight),
            ("topic_weight", s.topic_weight),
            ("neutral_signal", s.neutral_signal),
        ] {
            if !w.is_finite() || w < 0.0 {
                return fail(format!("{} must be a non-negative number, got {}", name, w));
            }
        }
        if s.recency_horizon_years == 0 {
            return fail("recency_horizon_years must be at least 1".to_string());
        }

        Ok(())
    }
}

fn find_default_config() -> Option<PathBuf> {
    [
        PathBuf::from("planner.toml"),
        PathBuf::from("backend/planner.toml"),
        PathBuf::from("../planner.toml"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> PlannerResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            PlannerError::configuration(format!("{} has an invalid value '{}'", key, raw))
                .with_stage("env_overrides")
        }),
        Err(_) => Ok(None),
    }
}
