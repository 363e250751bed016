use rand::SeedableRng;
use rand::rngs::StdRng;

use omni_core::Clock;
use omni_core::model::{AttemptRecord, CatalogEntry, QuestionSet, SessionMode};
use storage::{HistoryStore, SessionStore};

use crate::error::SessionError;
use super::build::SessionBuilder;
use super::session::{AdvanceOutcome, QuizSession, SelectionOutcome, TickOutcome};

/// Orchestrates session lifecycle against the persistence slots.
///
/// Every state change of a live session is written back to the
/// `quiz_session` slot; finishing appends an attempt to history and clears
/// the slot; aborting clears it without recording anything.
#[derive(Clone)]
pub struct SessionWorkflow {
    clock: Clock,
    sessions: SessionStore,
    history: HistoryStore,
    seed: Option<u64>,
}

impl SessionWorkflow {
    #[must_use]
    pub fn new(clock: Clock, sessions: SessionStore, history: HistoryStore) -> Self {
        Self {
            clock,
            sessions,
            history,
            seed: None,
        }
    }

    /// Fix the shuffle seed, making session generation reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Restore the persisted session for `entry`, or construct a new one.
    ///
    /// Restoration requires a snapshot whose set id matches the requested
    /// set and whose question list is non-empty; it brings back every field
    /// verbatim, including remaining time and progress. Anything else
    /// falls through to fresh construction.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for a selection with no questions, or
    /// a storage error from the initial persist.
    pub async fn start_or_resume(
        &self,
        entry: &CatalogEntry,
        set: &QuestionSet,
        mode: SessionMode,
    ) -> Result<QuizSession, SessionError> {
        if let Some(snapshot) = self.sessions.load().await? {
            // An index past the question list means the snapshot is stale or
            // hand-edited; treat it like any other malformed entry.
            if snapshot.set_id == entry.id
                && !snapshot.questions.is_empty()
                && snapshot.current_index < snapshot.questions.len()
            {
                tracing::info!(set_id = %entry.id, "resuming persisted session");
                return Ok(QuizSession::from_snapshot(snapshot));
            }
        }

        let mut rng = self.rng();
        let session = SessionBuilder::new(entry.id.clone(), set, mode).build(&mut rng)?;
        tracing::info!(
            set_id = %entry.id,
            questions = session.total(),
            seconds = session.seconds_remaining(),
            "starting new session"
        );
        self.persist(&session).await?;
        Ok(session)
    }

    /// Look up the catalog entry a persisted session points at.
    ///
    /// Used once at startup. Returns `None` when there is no usable
    /// snapshot; a snapshot naming a set that is missing from the catalog
    /// is skipped silently.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the slot cannot be read.
    pub async fn pending_resume(
        &self,
        catalog: &[CatalogEntry],
    ) -> Result<Option<(CatalogEntry, SessionMode)>, SessionError> {
        let Some(snapshot) = self.sessions.load().await? else {
            return Ok(None);
        };
        if snapshot.questions.is_empty() {
            return Ok(None);
        }
        match catalog.iter().find(|entry| entry.id == snapshot.set_id) {
            Some(entry) => Ok(Some((entry.clone(), snapshot.session_mode()))),
            None => {
                tracing::debug!(set_id = %snapshot.set_id, "persisted session has no catalog entry");
                Ok(None)
            }
        }
    }

    /// Drop any persisted session (fresh start or back-to-selection).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the slot cannot be cleared.
    pub async fn discard_pending(&self) -> Result<(), SessionError> {
        self.sessions.clear().await?;
        Ok(())
    }

    /// Select an option, persisting when it graded the question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn select_option(
        &self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<SelectionOutcome, SessionError> {
        let outcome = session.select_option(index);
        if matches!(outcome, SelectionOutcome::Graded { .. }) {
            self.persist(session).await?;
        }
        Ok(outcome)
    }

    /// Confirm the working multi-selection, persisting when graded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn confirm_selection(
        &self,
        session: &mut QuizSession,
    ) -> Result<Option<bool>, SessionError> {
        let graded = session.confirm_selection();
        if graded.is_some() {
            self.persist(session).await?;
        }
        Ok(graded)
    }

    /// Advance to the next question, finishing the run past the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn advance(
        &self,
        session: &mut QuizSession,
        entry: &CatalogEntry,
    ) -> Result<AdvanceOutcome, SessionError> {
        let outcome = session.advance();
        match outcome {
            AdvanceOutcome::Continue => self.persist(session).await?,
            AdvanceOutcome::Finished => {
                self.finish(session, entry).await?;
            }
            AdvanceOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Apply one timer tick, finishing the run when time expires.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if persistence fails.
    pub async fn tick(
        &self,
        session: &mut QuizSession,
        entry: &CatalogEntry,
    ) -> Result<TickOutcome, SessionError> {
        let outcome = session.tick();
        match outcome {
            TickOutcome::Continue => self.persist(session).await?,
            TickOutcome::Expired => {
                tracing::info!(set_id = %entry.id, "time expired, auto-submitting");
                self.finish(session, entry).await?;
            }
            TickOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Abort the run: stop the session and delete the persisted slot
    /// without recording an attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the slot cannot be cleared.
    pub async fn abort(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.abort();
        self.sessions.clear().await?;
        tracing::info!(set_id = %session.set_id(), "session aborted");
        Ok(())
    }

    /// Recent attempts for one set, newest first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if history cannot be read.
    pub async fn attempts_for(
        &self,
        entry: &CatalogEntry,
    ) -> Result<Vec<AttemptRecord>, SessionError> {
        Ok(self.history.for_set(&entry.id).await?)
    }

    async fn finish(
        &self,
        session: &QuizSession,
        entry: &CatalogEntry,
    ) -> Result<AttemptRecord, SessionError> {
        let total = u32::try_from(session.total()).unwrap_or(u32::MAX);
        let record = AttemptRecord::new(self.clock.now(), session.score(), total, entry.pass_line);
        self.history.append(&entry.id, record.clone()).await?;
        self.sessions.clear().await?;
        tracing::info!(
            set_id = %entry.id,
            score = record.score,
            total = record.total,
            passed = record.is_passed,
            "session finished"
        );
        Ok(record)
    }

    async fn persist(&self, session: &QuizSession) -> Result<(), SessionError> {
        if session.is_finished() || session.total() == 0 {
            return Ok(());
        }
        self.sessions
            .save(&session.snapshot(self.clock.now()))
            .await?;
        Ok(())
    }
}
