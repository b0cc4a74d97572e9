//! Study planner command-line front end.
//!
//! Reads a JSON request with the extracted questions and the plan parameters,
//! generates a schedule and prints a JSON report to stdout.
//!
//! # Usage
//!
//! ```bash
//! study-planner request.json
//! study-planner --config planner.toml request.json
//! cat request.json | study-planner -
//! ```
//!
//! # Request format
//!
//! ```json
//! {
//!   "questions": [{"text": "Explain quicksort", "topic": "Algorithms", "importance": 0.9}],
//!   "available_hours": 10,
//!   "study_duration": 25,
//!   "exam_date": "2025-06-20",
//!   "top_n": 10
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info), written to stderr
//! - `PLANNER_*`: Configuration overrides, see `PlannerConfig::load`

use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use study_planner::analysis::{analyze, AnalysisReport};
use study_planner::classify::{classify_or_fallback, KeywordClassifier, LabelClassifier, TopicClassifier};
use study_planner::fingerprint::schedule_checksum;
use study_planner::models::{PlanRequest, Question, Schedule};
use study_planner::{PlannerConfig, StudyPlanner};

#[derive(Debug, Deserialize)]
struct CliRequest {
    questions: Vec<Question>,
    available_hours: f64,
    #[serde(default, alias = "study_duration_minutes")]
    study_duration: Option<u32>,
    #[serde(default, alias = "break_duration_minutes")]
    break_duration: Option<u32>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    exam_date: Option<NaiveDate>,
    #[serde(default)]
    topics_to_include: Option<Vec<String>>,
    #[serde(default = "default_top_n")]
    top_n: usize,
    /// "labels" (default) or "keywords"
    #[serde(default)]
    classifier: Option<String>,
    /// Recompute importance from similarity groups instead of using the
    /// scores carried by the questions. Without it, only unscored questions
    /// are scored.
    #[serde(default)]
    similar_groups: Option<Vec<Vec<usize>>>,
}

fn default_top_n() -> usize {
    10
}

#[derive(Debug, Serialize)]
struct CliReport {
    schedule: Schedule,
    #[serde(flatten)]
    analysis: AnalysisReport,
    classification_fallback: bool,
    checksum: String,
}

struct Args {
    config: Option<String>,
    request: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = None;
    let mut request = None;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config = Some(args.next().context("--config requires a path")?);
            }
            "--help" | "-h" => {
                println!("usage: study-planner [--config <planner.toml>] <request.json | ->");
                std::process::exit(0);
            }
            _ if request.is_none() => request = Some(arg),
            _ => bail!("unexpected argument '{}'", arg),
        }
    }

    Ok(Args {
        config,
        request: request.context("missing request file (use '-' for stdin)")?,
    })
}

fn read_request(path: &str) -> anyhow::Result<CliRequest> {
    let raw = if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
    };
    serde_json::from_str(&raw).with_context(|| format!("invalid request in {}", path))
}

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let mut config = PlannerConfig::from_file(path)?;
            config.apply_env_overrides()?;
            config
        }
        None => PlannerConfig::load()?,
    };
    let planner = StudyPlanner::new(&config);

    let request = read_request(&args.request)?;
    info!("Loaded {} questions", request.questions.len());

    let classifier: Box<dyn TopicClassifier> = match request.classifier.as_deref() {
        None | Some("labels") => Box::new(LabelClassifier),
        Some("keywords") => Box::new(KeywordClassifier),
        Some(other) => bail!("unknown classifier '{}'", other),
    };
    let classification = classify_or_fallback(classifier.as_ref(), &request.questions);
    if classification.is_fallback() {
        warn!("Classification fell back to a single topic");
    }
    let fallback = classification.is_fallback();
    let topics = classification.into_topics();

    let importance = match &request.similar_groups {
        Some(groups) => planner
            .scorer()
            .score_corpus(&request.questions, &topics, groups),
        None => planner.scorer().score_missing(&request.questions, &topics)?,
    };

    let mut plan = PlanRequest::with_settings(request.available_hours, &config.planner)
        .with_dates(request.start_date, request.exam_date);
    if let Some(minutes) = request.study_duration {
        plan = plan.with_study_duration(minutes);
    }
    if let Some(minutes) = request.break_duration {
        plan = plan.with_break_duration(minutes);
    }
    if let Some(allow) = request.topics_to_include {
        plan = plan.with_topics(allow);
    }

    let schedule = planner.generate_schedule(&topics, &importance, &plan)?;
    let analysis = analyze(&request.questions, &topics, &importance, request.top_n);
    let checksum = schedule_checksum(&schedule)?;
    info!(
        "Planned {} sessions over {} days (checksum {})",
        schedule.total_sessions,
        schedule.day_count(),
        &checksum[..12]
    );

    let report = CliReport {
        schedule,
        analysis,
        classification_fallback: fallback,
        checksum,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
