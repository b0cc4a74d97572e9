#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use study_planner::models::{ImportanceMap, TopicGroup, TopicSet};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with `PLANNER_*` (or any) environment variables set or removed,
/// restoring the previous values afterwards, even on panic.
///
/// Tests touching the process environment are serialized through one lock.
/// `None` removes the variable for the duration of `f`.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore {
    previous: Vec<(String, Option<String>)>,
}

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        Self { previous }
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Write `content` to a fresh temporary `planner.toml`.
pub fn temp_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("planner")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}

pub fn topic_set(groups: Vec<(&str, Vec<&str>)>) -> TopicSet {
    groups
        .into_iter()
        .map(|(name, questions)| {
            TopicGroup::new(name, questions.into_iter().map(String::from).collect())
        })
        .collect()
}

pub fn importance(pairs: &[(&str, f64)]) -> ImportanceMap {
    pairs.iter().map(|(q, v)| (q.to_string(), *v)).collect()
}

/// Three algorithms questions and one databases question.
pub fn scenario() -> (TopicSet, ImportanceMap) {
    (
        topic_set(vec![
            ("Algorithms", vec!["q1", "q2", "q3"]),
            ("Databases", vec!["q4"]),
        ]),
        importance(&[("q1", 0.9), ("q2", 0.8), ("q3", 0.7), ("q4", 0.5)]),
    )
}
