use omni_core::model::{AnswerRecord, score_percentage};
use services::QuizSession;

/// Everything the result screen needs from a finished session.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub records: Vec<AnswerRecord>,
}

impl QuizResult {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            score: session.score(),
            total: u32::try_from(session.total()).unwrap_or(u32::MAX),
            records: session.records().to_vec(),
        }
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        score_percentage(self.score, self.total)
    }

    #[must_use]
    pub fn is_passed(&self, pass_line: u32) -> bool {
        self.percentage() >= pass_line
    }
}

/// Per-category accuracy of one finished session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryStat {
    pub name: String,
    pub correct: u32,
    pub answered: u32,
    pub percentage: u32,
}

/// Accuracy per major category, in first-appearance order.
///
/// `score_percentage` clamps an empty category to 0% instead of dividing by
/// zero, so the breakdown never renders an undefined value.
#[must_use]
pub fn category_breakdown(records: &[AnswerRecord]) -> Vec<CategoryStat> {
    let mut stats: Vec<CategoryStat> = Vec::new();
    for record in records {
        let name = record.question.major_category.as_str();
        let stat = match stats.iter_mut().find(|s| s.name == name) {
            Some(stat) => stat,
            None => {
                stats.push(CategoryStat {
                    name: name.to_owned(),
                    correct: 0,
                    answered: 0,
                    percentage: 0,
                });
                stats.last_mut().expect("just pushed")
            }
        };
        stat.answered += 1;
        if record.is_correct {
            stat.correct += 1;
        }
    }
    for stat in &mut stats {
        stat.percentage = score_percentage(stat.correct, stat.answered);
    }
    stats
}
