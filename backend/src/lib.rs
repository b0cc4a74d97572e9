//! # Study Planner
//!
//! Deterministic study-plan generation from exam questions.
//!
//! Given questions that were already extracted from past papers, this crate
//! scores how likely each question is to matter, groups them into topics,
//! splits a student's available hours across those topics and packs the
//! result into a day-by-day session schedule.
//!
//! ## Features
//!
//! - **Scoring**: frequency, recency and topic-density signals per question
//! - **Classification**: topic labels, keyword heuristics, and an explicit
//!   single-topic fallback when the upstream classifier fails
//! - **Planning**: proportional time allocation with a per-topic floor,
//!   session packing under a daily cap
//! - **Analysis**: per-topic summaries and predicted important questions
//! - **Fingerprinting**: SHA-256 checksums of generated schedules
//!
//! ## Architecture
//!
//! - [`models`]: Questions, topic groups, requests and schedules
//! - [`scoring`]: Question importance scoring
//! - [`classify`]: Topic classification seam
//! - [`planning`]: Aggregation, allocation, packing and the [`StudyPlanner`] service
//! - [`analysis`]: Corpus analytics
//! - [`config`]: `planner.toml` and `PLANNER_*` environment configuration
//! - [`error`]: [`PlannerError`] with structured context
//!
//! Everything in the library is synchronous and free of I/O apart from
//! configuration loading. Service objects hold only configuration and are
//! `Send + Sync`.
//!
//! ## Example
//!
//! ```
//! use study_planner::classify::LabelClassifier;
//! use study_planner::models::{PlanRequest, Question};
//! use study_planner::StudyPlanner;
//!
//! let questions = vec![
//!     Question::new("Explain quicksort").with_topic("Algorithms").with_importance(0.9),
//!     Question::new("Define 3NF").with_topic("Databases").with_importance(0.5),
//! ];
//! let schedule = StudyPlanner::default()
//!     .plan(&questions, &LabelClassifier, &PlanRequest::new(4.0))
//!     .unwrap();
//! assert_eq!(schedule.total_sessions, schedule.sessions.len());
//! ```

pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod planning;
pub mod scoring;
pub mod util;

pub use config::PlannerConfig;
pub use error::{ErrorContext, PlannerError, PlannerResult};
pub use planning::{PredictedQuestion, StudyPlanner};
