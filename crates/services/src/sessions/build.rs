use rand::Rng;
use rand::seq::SliceRandom;

use omni_core::model::{
    Question, QuestionSet, SessionMode, SessionQuestion, SetId, time_budget_secs,
};

use crate::error::SessionError;
use super::session::QuizSession;

/// Builds a new session from a question set under a chosen mode.
///
/// Selection is deterministic (category filter in original order, or the
/// first `totalQuestions` items for a full exam); all randomness comes from
/// the injected `Rng`, so a seeded generator reproduces every shuffle.
pub struct SessionBuilder<'a> {
    set_id: SetId,
    set: &'a QuestionSet,
    mode: SessionMode,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(set_id: SetId, set: &'a QuestionSet, mode: SessionMode) -> Self {
        Self { set_id, set, mode }
    }

    /// Build the session: select the subset, reorder each question's
    /// options with an independent uniform permutation, shuffle the
    /// question order, and compute the proportional time budget.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the selection has no questions.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<QuizSession, SessionError> {
        let selected: Vec<&Question> = match &self.mode {
            SessionMode::Category(category) => self
                .set
                .questions
                .iter()
                .filter(|q| q.major_category == *category)
                .collect(),
            SessionMode::Full => self
                .set
                .questions
                .iter()
                .take(self.set.metadata.total_questions as usize)
                .collect(),
        };

        if selected.is_empty() {
            return Err(SessionError::Empty);
        }

        let mut questions = Vec::with_capacity(selected.len());
        for question in selected {
            let mut order: Vec<usize> = (0..question.options.len()).collect();
            order.shuffle(rng);
            questions.push(SessionQuestion::reorder(question, &order)?);
        }
        questions.shuffle(rng);

        let seconds = time_budget_secs(&self.set.metadata, questions.len());
        Ok(QuizSession::from_parts(
            self.set_id,
            self.mode,
            questions,
            seconds,
        ))
    }
}
