use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent attempts kept per set; older entries are dropped.
pub const MAX_ATTEMPTS_PER_SET: usize = 10;

/// Percentage of `score` out of `total`, rounded to the nearest integer.
///
/// A zero total yields 0 rather than a division by zero.
#[must_use]
pub fn score_percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    u32::try_from((score * 100 + total / 2) / total).unwrap_or(100)
}

/// A finished session's summary, retained in per-set history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub is_passed: bool,
}

impl AttemptRecord {
    /// Summarizes a finished session against the set's pass line.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, score: u32, total: u32, pass_line: u32) -> Self {
        let percentage = score_percentage(score, total);
        Self {
            timestamp,
            score,
            total,
            percentage,
            is_passed: percentage >= pass_line,
        }
    }
}
