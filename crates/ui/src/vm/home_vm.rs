use omni_core::model::{AttemptRecord, QuestionSet};

use super::time_fmt::format_attempt_date;

/// One category card on the home screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryVm {
    pub name: String,
    pub count: usize,
}

/// Categories of a set with their question counts, in set order.
#[must_use]
pub fn map_categories(set: &QuestionSet) -> Vec<CategoryVm> {
    set.categories()
        .into_iter()
        .map(|name| CategoryVm {
            name: name.to_owned(),
            count: set.category_len(name),
        })
        .collect()
}

/// One row in the home screen's history panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptVm {
    pub score_label: String,
    pub date_label: String,
    pub is_passed: bool,
}

/// Attempt rows for display, newest first as stored.
#[must_use]
pub fn map_attempts(attempts: &[AttemptRecord]) -> Vec<AttemptVm> {
    attempts
        .iter()
        .map(|attempt| AttemptVm {
            score_label: format!("{} / {}", attempt.score, attempt.total),
            date_label: format_attempt_date(attempt.timestamp),
            is_passed: attempt.is_passed,
        })
        .collect()
}
