use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer index {index} is out of range for {len} options")]
    AnswerOutOfRange { index: usize, len: usize },

    #[error("multi-answer key cannot be empty")]
    EmptyAnswerKey,
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// The correct answer of a question: one option index, or a set of them.
///
/// Serialized untagged so a set document can carry either a bare number or
/// an array of numbers, matching the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Single(usize),
    Multiple(Vec<usize>),
}

impl AnswerKey {
    /// Returns true for questions that expect a set of options.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, AnswerKey::Multiple(_))
    }

    /// All correct option indices, in key order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        match self {
            AnswerKey::Single(index) => vec![*index],
            AnswerKey::Multiple(indices) => indices.clone(),
        }
    }

    /// Returns true if the option at `index` is part of the correct answer.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        match self {
            AnswerKey::Single(answer) => *answer == index,
            AnswerKey::Multiple(indices) => indices.contains(&index),
        }
    }

    /// Grades a submitted selection against this key.
    ///
    /// Single-answer keys require index equality. Multi-answer keys require
    /// exact set equality: a subset or superset of the correct set is wrong,
    /// and a single selection never satisfies a multi key (or vice versa).
    #[must_use]
    pub fn accepts(&self, selection: &Selection) -> bool {
        match (self, selection) {
            (AnswerKey::Single(answer), Selection::Single(chosen)) => answer == chosen,
            (AnswerKey::Multiple(answers), Selection::Multiple(chosen)) => {
                let mut expected = answers.clone();
                expected.sort_unstable();
                expected == *chosen
            }
            _ => false,
        }
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// What the user submitted for one question.
///
/// `Multiple` is kept sorted ascending and deduplicated; build it through
/// [`Selection::multiple`] to preserve that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Single(usize),
    Multiple(Vec<usize>),
}

impl Selection {
    /// Builds a multi-selection, sorting and deduplicating the indices.
    #[must_use]
    pub fn multiple(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Selection::Multiple(indices)
    }

    /// Returns true if the option at `index` was part of the selection.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        match self {
            Selection::Single(chosen) => *chosen == index,
            Selection::Multiple(indices) => indices.contains(&index),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question as stored in a set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub major_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub question: String,
    /// Optional data table; the first row is the header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Vec<String>>>,
    pub options: Vec<String>,
    pub answer: AnswerKey,
    pub explanation: String,
}

impl Question {
    /// Checks the structural invariants of a deserialized question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, there are fewer than
    /// two options, or any answer index does not reference an option.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let len = self.options.len();
        if len < 2 {
            return Err(QuestionError::TooFewOptions { len });
        }
        let indices = self.answer.indices();
        if indices.is_empty() {
            return Err(QuestionError::EmptyAnswerKey);
        }
        for index in indices {
            if index >= len {
                return Err(QuestionError::AnswerOutOfRange { index, len });
            }
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: AnswerKey) -> Question {
        Question {
            major_category: "Networking".to_owned(),
            sub_category: None,
            question: "Which layer routes packets?".to_owned(),
            table: None,
            options: vec!["Physical".into(), "Network".into(), "Session".into()],
            answer,
            explanation: "Routing happens at the network layer.".to_owned(),
        }
    }

    #[test]
    fn single_key_requires_index_equality() {
        let key = AnswerKey::Single(1);
        assert!(key.accepts(&Selection::Single(1)));
        assert!(!key.accepts(&Selection::Single(0)));
        assert!(!key.accepts(&Selection::multiple(vec![1])));
    }

    #[test]
    fn multi_key_requires_exact_set_equality() {
        let key = AnswerKey::Multiple(vec![0, 1, 2]);
        assert!(key.accepts(&Selection::multiple(vec![2, 0, 1])));
        // Subset and superset both grade wrong.
        assert!(!key.accepts(&Selection::multiple(vec![0, 2])));
        assert!(!key.accepts(&Selection::multiple(vec![0, 1, 2, 3])));
        assert!(!key.accepts(&Selection::Single(0)));
    }

    #[test]
    fn multi_selection_is_sorted_and_deduplicated() {
        let selection = Selection::multiple(vec![2, 0, 2, 1]);
        assert_eq!(selection, Selection::Multiple(vec![0, 1, 2]));
    }

    #[test]
    fn answer_key_deserializes_untagged() {
        let single: AnswerKey = serde_json::from_str("1").unwrap();
        assert_eq!(single, AnswerKey::Single(1));
        let multi: AnswerKey = serde_json::from_str("[0, 2]").unwrap();
        assert_eq!(multi, AnswerKey::Multiple(vec![0, 2]));
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        let q = question(AnswerKey::Single(3));
        assert_eq!(
            q.validate().unwrap_err(),
            QuestionError::AnswerOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn validate_rejects_empty_multi_key() {
        let q = question(AnswerKey::Multiple(Vec::new()));
        assert_eq!(q.validate().unwrap_err(), QuestionError::EmptyAnswerKey);
    }

    #[test]
    fn validate_accepts_well_formed_question() {
        question(AnswerKey::Multiple(vec![0, 1])).validate().unwrap();
    }
}
