use indexmap::IndexMap;

use super::TopicClassifier;
use crate::error::PlannerResult;
use crate::models::{Question, TopicGroup, TopicSet, DEFAULT_TOPIC};

/// Subject keywords and the topic they name, checked in order.
const SUBJECT_KEYWORDS: &[(&str, &str)] = &[
    ("algorithm", "Algorithms"),
    ("data structure", "Data Structures"),
    ("database", "Databases"),
    ("network", "Networking"),
    ("operating system", "Operating Systems"),
    ("software", "Software Engineering"),
    ("web", "Web Development"),
    ("security", "Security"),
    ("machine learning", "Machine Learning"),
    ("ai", "Artificial Intelligence"),
    ("calculus", "Calculus"),
    ("algebra", "Algebra"),
    ("probability", "Probability"),
    ("statistics", "Statistics"),
    ("physics", "Physics"),
    ("chemistry", "Chemistry"),
    ("biology", "Biology"),
    ("programming", "Programming"),
    ("java", "Java Programming"),
    ("python", "Python Programming"),
    ("c++", "C++ Programming"),
];

const STOP_WORDS: &[&str] = &[
    "what", "which", "where", "when", "explain", "describe", "define", "discuss", "compare",
    "with", "that", "this", "from", "have", "been",
];

/// Name used when a cluster has no keyword and no significant words.
pub const UNNAMED_TOPIC: &str = "General Topic";

const MIN_SIGNIFICANT_LEN: usize = 4;

/// Keywords shorter than this must match a whole word rather than a prefix.
const MIN_PREFIX_KEYWORD_LEN: usize = 3;

/// Heuristic classifier based on a fixed table of subject keywords.
///
/// As a [`TopicClassifier`] it labels each question independently with the
/// first subject keyword found in it, or [`DEFAULT_TOPIC`]. It can also name
/// clusters produced by an external embedding step, see
/// [`KeywordClassifier::name_clusters`].
///
/// Keywords match at the start of a word, so "algorithm" matches
/// "algorithms" but "ai" does not match "explain".
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Topic named by the first keyword found in `text`.
    pub fn subject_of(text: &str) -> Option<&'static str> {
        let normalized = normalize(text);
        SUBJECT_KEYWORDS
            .iter()
            .find(|(keyword, _)| matches_keyword(&normalized, keyword))
            .map(|(_, topic)| *topic)
    }

    /// Name a cluster of questions.
    ///
    /// The first subject keyword anywhere in the cluster wins. Otherwise the
    /// two most common significant words (four letters or more, stop words
    /// removed), capitalized, ties going to the word seen first. A cluster
    /// with neither is [`UNNAMED_TOPIC`].
    pub fn name_group<S: AsRef<str>>(questions: &[S]) -> String {
        let combined = questions
            .iter()
            .map(|q| q.as_ref())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(topic) = Self::subject_of(&combined) {
            return topic.to_string();
        }

        let lowered = combined.to_lowercase();
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for word in lowered.split(|c: char| !c.is_ascii_alphanumeric()) {
            if word.len() >= MIN_SIGNIFICANT_LEN
                && word.chars().all(|c| c.is_ascii_lowercase())
                && !STOP_WORDS.contains(&word)
            {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
        if counts.is_empty() {
            return UNNAMED_TOPIC.to_string();
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .iter()
            .take(2)
            .map(|(word, _)| capitalize(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Name externally produced clusters. Clusters that end up with the same
    /// name are merged in cluster order.
    pub fn name_clusters(clusters: Vec<Vec<String>>) -> TopicSet {
        let topics: TopicSet = clusters
            .into_iter()
            .filter(|cluster| !cluster.is_empty())
            .map(|cluster| TopicGroup::new(Self::name_group(&cluster), cluster))
            .collect();
        log::debug!("Named clusters into {} topics", topics.len());
        topics
    }
}

impl TopicClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keywords"
    }

    fn classify(&self, questions: &[Question]) -> PlannerResult<TopicSet> {
        let mut topics = TopicSet::new();
        for q in questions {
            let topic = Self::subject_of(&q.text).unwrap_or(DEFAULT_TOPIC);
            topics.insert_question(topic, q.text.clone());
        }
        Ok(topics)
    }
}

/// Lowercase, with every character other than letters, digits and '+'
/// turned into a single space, padded with a leading space.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    out.push(' ');
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '+' {
            out.push(c);
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out
}

fn matches_keyword(normalized: &str, keyword: &str) -> bool {
    let needle = format!(" {}", keyword);
    if keyword.len() >= MIN_PREFIX_KEYWORD_LEN {
        return normalized.contains(&needle);
    }
    normalized.match_indices(&needle).any(|(idx, _)| {
        normalized[idx + needle.len()..]
            .chars()
            .next()
            .map_or(true, |c| c == ' ')
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
