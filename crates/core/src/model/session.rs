use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerKey, Question, Selection, SetMetadata};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReorderError {
    #[error("permutation has length {got}, question has {expected} options")]
    LengthMismatch { expected: usize, got: usize },

    #[error("permutation is not a bijection on option positions")]
    NotAPermutation,
}

//
// ─── SESSION MODE ──────────────────────────────────────────────────────────────
//

/// How a session draws questions from its set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// Timed exam over up to `totalQuestions` items.
    Full,
    /// Practice restricted to one major category.
    Category(String),
}

impl SessionMode {
    /// The category filter, if this is a practice session.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            SessionMode::Full => None,
            SessionMode::Category(name) => Some(name),
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, SessionMode::Full)
    }
}

//
// ─── SESSION QUESTION ──────────────────────────────────────────────────────────
//

/// A question whose options were reordered for one session.
///
/// Produced only by [`SessionQuestion::reorder`]; the original option order
/// is discarded, so the transformation is one-way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuestion {
    pub major_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Vec<String>>>,
    pub options: Vec<String>,
    pub answer: AnswerKey,
    pub explanation: String,
}

impl SessionQuestion {
    /// Applies a permutation to a question's options and remaps its answer.
    ///
    /// `order` gives, for each new position, the original option position:
    /// `options[i] = question.options[order[i]]`. Single answers map to the
    /// position that now holds the original answer text; multi answers map
    /// index by index and are re-sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns `ReorderError` if `order` is not a permutation of the
    /// question's option positions.
    pub fn reorder(question: &Question, order: &[usize]) -> Result<Self, ReorderError> {
        let len = question.options.len();
        if order.len() != len {
            return Err(ReorderError::LengthMismatch {
                expected: len,
                got: order.len(),
            });
        }
        let mut seen = vec![false; len];
        for &original in order {
            if original >= len || seen[original] {
                return Err(ReorderError::NotAPermutation);
            }
            seen[original] = true;
        }

        let new_index = |original: usize| {
            order
                .iter()
                .position(|&o| o == original)
                .expect("checked permutation covers every position")
        };

        let answer = match &question.answer {
            AnswerKey::Single(index) => AnswerKey::Single(new_index(*index)),
            AnswerKey::Multiple(indices) => {
                let mut mapped: Vec<usize> = indices.iter().map(|&i| new_index(i)).collect();
                mapped.sort_unstable();
                AnswerKey::Multiple(mapped)
            }
        };

        Ok(Self {
            major_category: question.major_category.clone(),
            sub_category: question.sub_category.clone(),
            question: question.question.clone(),
            table: question.table.clone(),
            options: order.iter().map(|&i| question.options[i].clone()).collect(),
            answer,
            explanation: question.explanation.clone(),
        })
    }

    /// Option texts the answer key points at, for cross-checking reorders.
    #[must_use]
    pub fn answer_texts(&self) -> Vec<&str> {
        self.answer
            .indices()
            .into_iter()
            .map(|i| self.options[i].as_str())
            .collect()
    }
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// The graded outcome of one answered question within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question: SessionQuestion,
    pub user_choice: Selection,
    pub is_correct: bool,
}

impl AnswerRecord {
    /// Grades a selection against the question and records the outcome.
    #[must_use]
    pub fn grade(question: SessionQuestion, user_choice: Selection) -> Self {
        let is_correct = question.answer.accepts(&user_choice);
        Self {
            question,
            user_choice,
            is_correct,
        }
    }
}

//
// ─── TIME BUDGET ───────────────────────────────────────────────────────────────
//

/// Seconds granted to a session, proportional to its question count.
///
/// `round(time_limit_secs * session_count / total_questions)`: a category
/// session with half the questions of a full exam gets half the time.
#[must_use]
pub fn time_budget_secs(metadata: &SetMetadata, session_question_count: usize) -> u32 {
    let base = u64::from(metadata.time_limit_secs());
    let total = u64::from(metadata.total_questions.max(1));
    let count = session_question_count as u64;
    let budget = (base * count + total / 2) / total;
    u32::try_from(budget).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
