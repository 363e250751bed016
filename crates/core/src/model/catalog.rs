use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Question, SetId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetadataError {
    #[error("set title cannot be empty")]
    EmptyTitle,

    #[error("total question count must be > 0")]
    InvalidTotalQuestions,

    #[error("time limit must be > 0 minutes")]
    InvalidTimeLimit,

    #[error("pass line must be between 0 and 100, got {value}")]
    InvalidPassLine { value: u32 },
}

//
// ─── SET METADATA ──────────────────────────────────────────────────────────────
//

/// Exam parameters of a question set, embedded in every set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMetadata {
    pub title: String,
    pub description: String,
    /// Number of questions a full exam draws from the set.
    pub total_questions: u32,
    /// Full-exam time limit, in minutes.
    pub time_limit: u32,
    /// Passing threshold, in percent.
    pub pass_line: u32,
}

impl SetMetadata {
    /// Checks the invariants of deserialized metadata.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError` on an empty title, a zero question count or
    /// time limit, or a pass line above 100.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.title.trim().is_empty() {
            return Err(MetadataError::EmptyTitle);
        }
        if self.total_questions == 0 {
            return Err(MetadataError::InvalidTotalQuestions);
        }
        if self.time_limit == 0 {
            return Err(MetadataError::InvalidTimeLimit);
        }
        if self.pass_line > 100 {
            return Err(MetadataError::InvalidPassLine {
                value: self.pass_line,
            });
        }
        Ok(())
    }

    /// Full-exam time limit, in seconds.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit * 60
    }
}

//
// ─── CATALOG ENTRY ─────────────────────────────────────────────────────────────
//

/// One row of the catalog index: a set's metadata plus where to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: SetId,
    /// File name of the set document, relative to the sets directory.
    pub file: String,
    pub title: String,
    pub description: String,
    pub total_questions: u32,
    pub time_limit: u32,
    pub pass_line: u32,
}

impl CatalogEntry {
    /// Builds an index row from a set document's metadata.
    #[must_use]
    pub fn from_metadata(id: SetId, file: impl Into<String>, metadata: &SetMetadata) -> Self {
        Self {
            id,
            file: file.into(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            total_questions: metadata.total_questions,
            time_limit: metadata.time_limit,
            pass_line: metadata.pass_line,
        }
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// A full question-set document: metadata plus the ordered question list.
///
/// Immutable once loaded; sessions work on reordered copies of the
/// questions, never on the set itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub metadata: SetMetadata,
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Validates the metadata and every question in the set.
    ///
    /// # Errors
    ///
    /// Returns the metadata error or the first failing question's error.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.metadata.validate()?;
        for question in &self.questions {
            question.validate()?;
        }
        Ok(())
    }

    /// Distinct major categories, in first-appearance order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for question in &self.questions {
            let category = question.major_category.as_str();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Number of questions in the given major category.
    #[must_use]
    pub fn category_len(&self, category: &str) -> usize {
        self.questions
            .iter()
            .filter(|q| q.major_category == category)
            .count()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
