//! Topic groups: named, ordered question sets produced by classification.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A topic and its questions in upstream clustering order.
///
/// The order carries no meaning of its own but must stay stable so that
/// session slicing is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGroup {
    pub name: String,
    pub questions: Vec<String>,
}

impl TopicGroup {
    pub fn new(name: impl Into<String>, questions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn contains(&self, question: &str) -> bool {
        self.questions.iter().any(|q| q == question)
    }
}

/// Ordered collection of uniquely named topic groups.
///
/// Deserialization goes through [`TopicSet::push`], so duplicate names in the
/// input are merged like any other insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TopicGroup>", into = "Vec<TopicGroup>")]
pub struct TopicSet {
    groups: Vec<TopicGroup>,
}

impl TopicSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group. A group with an existing name is merged into it, keeping
    /// the earlier group's position.
    pub fn push(&mut self, group: TopicGroup) {
        match self.groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => existing.questions.extend(group.questions),
            None => self.groups.push(group),
        }
    }

    /// Append one question to the named topic, creating it at the end if new.
    pub fn insert_question(&mut self, topic: &str, question: impl Into<String>) {
        match self.groups.iter_mut().find(|g| g.name == topic) {
            Some(existing) => existing.questions.push(question.into()),
            None => self
                .groups
                .push(TopicGroup::new(topic, vec![question.into()])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TopicGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopicGroup> {
        self.groups.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total questions across all groups.
    pub fn question_count(&self) -> usize {
        self.groups.iter().map(TopicGroup::len).sum()
    }

    /// First topic whose group contains `question`.
    pub fn topic_of(&self, question: &str) -> Option<&TopicGroup> {
        self.groups.iter().find(|g| g.contains(question))
    }

    /// Keep only the topics named in `allow`, preserving order.
    pub fn retain_named<S: AsRef<str>>(&self, allow: &[S]) -> TopicSet {
        TopicSet {
            groups: self
                .groups
                .iter()
                .filter(|g| allow.iter().any(|a| a.as_ref() == g.name))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<TopicGroup> for TopicSet {
    fn from_iter<I: IntoIterator<Item = TopicGroup>>(iter: I) -> Self {
        let mut set = TopicSet::new();
        for group in iter {
            set.push(group);
        }
        set
    }
}

impl From<Vec<TopicGroup>> for TopicSet {
    fn from(groups: Vec<TopicGroup>) -> Self {
        groups.into_iter().collect()
    }
}

impl From<TopicSet> for Vec<TopicGroup> {
    fn from(set: TopicSet) -> Self {
        set.groups
    }
}

impl From<IndexMap<String, Vec<String>>> for TopicSet {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        map.into_iter()
            .map(|(name, questions)| TopicGroup::new(name, questions))
            .collect()
    }
}

impl<'a> IntoIterator for &'a TopicSet {
    type Item = &'a TopicGroup;
    type IntoIter = std::slice::Iter<'a, TopicGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
