use std::fmt;

use chrono::{DateTime, Utc};

use omni_core::model::{AnswerRecord, Selection, SessionMode, SessionQuestion, SetId};
use storage::SessionSnapshot;

use super::progress::SessionProgress;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Where the current question stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    /// Waiting for a selection.
    Answering,
    /// Graded; explanation and correctness markers are visible, selection
    /// is frozen.
    Revealed,
}

/// What a pointer or keyboard selection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Selection is frozen or the index is out of range; nothing changed.
    Ignored,
    /// Multi-answer question: membership toggled, nothing submitted yet.
    Toggled,
    /// Single-answer question: submitted and graded immediately.
    Graded { is_correct: bool },
}

/// What advancing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Nothing to advance from (not graded yet, or already finished).
    Ignored,
    /// Moved to the next question.
    Continue,
    /// Moved past the last question; the session is finished.
    Finished,
}

/// What one timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is no longer running; the timer should stop.
    Ignored,
    /// One second elapsed.
    Continue,
    /// Time ran out; the session finished with the answers recorded so far.
    Expired,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One in-progress attempt at a question set.
///
/// Owns the reordered questions, the countdown, the score, and the graded
/// answer records. All methods are synchronous; persistence is layered on
/// top by `SessionWorkflow`.
#[derive(Clone, PartialEq)]
pub struct QuizSession {
    set_id: SetId,
    mode: SessionMode,
    questions: Vec<SessionQuestion>,
    current: usize,
    score: u32,
    records: Vec<AnswerRecord>,
    seconds_remaining: u32,
    // Working multi-selection, kept sorted; transient, never persisted.
    working: Vec<usize>,
    finished: bool,
}

impl QuizSession {
    pub(crate) fn from_parts(
        set_id: SetId,
        mode: SessionMode,
        questions: Vec<SessionQuestion>,
        seconds_remaining: u32,
    ) -> Self {
        Self {
            set_id,
            mode,
            questions,
            current: 0,
            score: 0,
            records: Vec::new(),
            seconds_remaining,
            working: Vec::new(),
            finished: false,
        }
    }

    /// Rebuild a session from a persisted snapshot, field for field.
    ///
    /// The reveal phase is derived rather than stored: when more records
    /// exist than the current index, the current question was already
    /// graded before the snapshot was taken, so the session resumes
    /// revealed instead of letting the same question be graded twice.
    #[must_use]
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let mode = snapshot.session_mode();
        let finished = snapshot.current_index >= snapshot.questions.len();
        Self {
            set_id: snapshot.set_id,
            mode,
            questions: snapshot.questions,
            current: snapshot.current_index,
            score: snapshot.score,
            records: snapshot.history,
            seconds_remaining: snapshot.time_left,
            working: Vec::new(),
            finished,
        }
    }

    /// Serialize the full session state for the persistence slot.
    #[must_use]
    pub fn snapshot(&self, written_at: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot::new(
            self.set_id.clone(),
            &self.mode,
            self.questions.clone(),
            self.current,
            self.score,
            self.records.clone(),
            self.seconds_remaining,
            written_at,
        )
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn set_id(&self) -> &SetId {
        &self.set_id
    }

    #[must_use]
    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    #[must_use]
    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    #[must_use]
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&SessionQuestion> {
        self.questions.get(self.current)
    }

    /// The phase of the current question, derived from the record count.
    #[must_use]
    pub fn phase(&self) -> QuestionPhase {
        if self.records.len() > self.current {
            QuestionPhase::Revealed
        } else {
            QuestionPhase::Answering
        }
    }

    /// The graded record of the current question, once revealed.
    #[must_use]
    pub fn current_record(&self) -> Option<&AnswerRecord> {
        match self.phase() {
            QuestionPhase::Revealed => self.records.get(self.current),
            QuestionPhase::Answering => None,
        }
    }

    /// Whether the option at `index` is currently selected: the working
    /// set while answering a multi question, the submitted choice once
    /// revealed.
    #[must_use]
    pub fn is_option_selected(&self, index: usize) -> bool {
        match self.current_record() {
            Some(record) => record.user_choice.contains(index),
            None => self.working.contains(&index),
        }
    }

    /// Whether the working multi-selection is non-empty (enables confirm).
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.phase() == QuestionPhase::Answering
            && self
                .current_question()
                .is_some_and(|q| q.answer.is_multiple())
            && !self.working.is_empty()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.records.len(),
            remaining: self.total().saturating_sub(self.records.len()),
            is_finished: self.finished,
        }
    }

    //
    // ─── ANSWER CAPTURE ────────────────────────────────────────────────────
    //

    /// Select the option at `index` on the current question.
    ///
    /// Single-answer questions grade immediately; multi-answer questions
    /// toggle membership in the working selection. Out-of-range indices and
    /// selections after grading are ignored.
    pub fn select_option(&mut self, index: usize) -> SelectionOutcome {
        if self.finished || self.phase() == QuestionPhase::Revealed {
            return SelectionOutcome::Ignored;
        }
        let Some(question) = self.questions.get(self.current) else {
            return SelectionOutcome::Ignored;
        };
        if index >= question.options.len() {
            return SelectionOutcome::Ignored;
        }

        if question.answer.is_multiple() {
            match self.working.iter().position(|&i| i == index) {
                Some(at) => {
                    self.working.remove(at);
                }
                None => {
                    self.working.push(index);
                    self.working.sort_unstable();
                }
            }
            SelectionOutcome::Toggled
        } else {
            let is_correct = self.grade(Selection::Single(index));
            SelectionOutcome::Graded { is_correct }
        }
    }

    /// Submit the working multi-selection as the final choice.
    ///
    /// Returns the correctness of the graded answer, or `None` when there
    /// is nothing to confirm (single-answer question, empty working set, or
    /// already revealed).
    pub fn confirm_selection(&mut self) -> Option<bool> {
        if !self.can_confirm() {
            return None;
        }
        let selection = Selection::multiple(std::mem::take(&mut self.working));
        Some(self.grade(selection))
    }

    fn grade(&mut self, selection: Selection) -> bool {
        let question = self.questions[self.current].clone();
        let record = AnswerRecord::grade(question, selection);
        let is_correct = record.is_correct;
        if is_correct {
            self.score += 1;
        }
        self.records.push(record);
        self.working.clear();
        is_correct
    }

    //
    // ─── ADVANCING & TIMER ─────────────────────────────────────────────────
    //

    /// Move to the next question, or finish after the last one.
    ///
    /// Only effective once the current question has been graded.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.finished || self.phase() != QuestionPhase::Revealed {
            return AdvanceOutcome::Ignored;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.working.clear();
            AdvanceOutcome::Continue
        } else {
            self.finished = true;
            AdvanceOutcome::Finished
        }
    }

    /// Count one second off the clock.
    ///
    /// When the remainder reaches zero the session finishes immediately,
    /// keeping exactly the answers recorded so far.
    pub fn tick(&mut self) -> TickOutcome {
        if self.finished {
            return TickOutcome::Ignored;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.finished = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Continue
        }
    }

    /// Stop the session without finishing it (user abort).
    pub fn abort(&mut self) {
        self.finished = true;
        self.working.clear();
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("set_id", &self.set_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("records_len", &self.records.len())
            .field("seconds_remaining", &self.seconds_remaining)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
