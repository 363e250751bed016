use omni_core::model::CatalogEntry;
use services::{AdvanceOutcome, QuizSession, SessionWorkflow, TickOutcome};

use crate::views::ViewError;
use super::result_vm::QuizResult;

/// Every action the quiz screen can apply, from pointer or keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SelectOption(usize),
    ConfirmSelection,
    Advance,
    Tick,
    RequestAbort,
    DismissAbort,
    ConfirmAbort,
}

/// What applying an intent led to.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizOutcome {
    Continue,
    Finished(QuizResult),
    Aborted,
}

/// Live quiz state behind the quiz view: the running session plus the
/// abort-confirmation prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    session: QuizSession,
    abort_prompt: bool,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            abort_prompt: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn abort_prompt_open(&self) -> bool {
        self.abort_prompt
    }

    /// Apply one intent through the persistence workflow.
    ///
    /// While the abort prompt is open, only the prompt intents have any
    /// effect; the timer keeps ticking underneath it.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` for storage failures.
    pub async fn apply(
        &mut self,
        workflow: &SessionWorkflow,
        entry: &CatalogEntry,
        intent: QuizIntent,
    ) -> Result<QuizOutcome, ViewError> {
        match intent {
            QuizIntent::SelectOption(index) => {
                if !self.abort_prompt {
                    workflow
                        .select_option(&mut self.session, index)
                        .await
                        .map_err(|_| ViewError::Unknown)?;
                }
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::ConfirmSelection => {
                if !self.abort_prompt {
                    workflow
                        .confirm_selection(&mut self.session)
                        .await
                        .map_err(|_| ViewError::Unknown)?;
                }
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::Advance => {
                if self.abort_prompt {
                    return Ok(QuizOutcome::Continue);
                }
                let outcome = workflow
                    .advance(&mut self.session, entry)
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                if outcome == AdvanceOutcome::Finished {
                    return Ok(QuizOutcome::Finished(QuizResult::from_session(&self.session)));
                }
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::Tick => {
                let outcome = workflow
                    .tick(&mut self.session, entry)
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                if outcome == TickOutcome::Expired {
                    return Ok(QuizOutcome::Finished(QuizResult::from_session(&self.session)));
                }
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::RequestAbort => {
                self.abort_prompt = true;
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::DismissAbort => {
                self.abort_prompt = false;
                Ok(QuizOutcome::Continue)
            }
            QuizIntent::ConfirmAbort => {
                workflow
                    .abort(&mut self.session)
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                Ok(QuizOutcome::Aborted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use omni_core::model::{
        AnswerKey, Question, QuestionSet, SessionMode, SetId, SetMetadata,
    };
    use omni_core::time::fixed_clock;
    use storage::repository::{InMemoryKeyValueStore, KeyValueStore};
    use storage::{HistoryStore, SessionStore};

    fn set() -> QuestionSet {
        QuestionSet {
            metadata: SetMetadata {
                title: "Vm Exam".to_owned(),
                description: String::new(),
                total_questions: 2,
                time_limit: 1,
                pass_line: 50,
            },
            questions: vec![
                Question {
                    major_category: "General".to_owned(),
                    sub_category: None,
                    question: "q1".to_owned(),
                    table: None,
                    options: vec!["a".into(), "b".into()],
                    answer: AnswerKey::Single(0),
                    explanation: "n/a".to_owned(),
                },
                Question {
                    major_category: "General".to_owned(),
                    sub_category: None,
                    question: "q2".to_owned(),
                    table: None,
                    options: vec!["a".into(), "b".into()],
                    answer: AnswerKey::Single(1),
                    explanation: "n/a".to_owned(),
                },
            ],
        }
    }

    fn entry() -> CatalogEntry {
        CatalogEntry::from_metadata(SetId::new("vm"), "vm.json", &set().metadata)
    }

    async fn vm_and_workflow() -> (QuizVm, SessionWorkflow) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let workflow = SessionWorkflow::new(
            fixed_clock(),
            SessionStore::new(Arc::clone(&kv)),
            HistoryStore::new(kv),
        )
        .with_seed(3);
        let session = workflow
            .start_or_resume(&entry(), &set(), SessionMode::Full)
            .await
            .unwrap();
        (QuizVm::new(session), workflow)
    }

    #[tokio::test]
    async fn answering_and_advancing_finishes_with_a_result() {
        let (mut vm, workflow) = vm_and_workflow().await;
        let entry = entry();

        for _ in 0..2 {
            let answer = vm.session().current_question().unwrap().answer.clone();
            let AnswerKey::Single(index) = answer else {
                panic!("fixture uses single answers");
            };
            vm.apply(&workflow, &entry, QuizIntent::SelectOption(index))
                .await
                .unwrap();
            match vm.apply(&workflow, &entry, QuizIntent::Advance).await.unwrap() {
                QuizOutcome::Continue => {}
                QuizOutcome::Finished(result) => {
                    assert_eq!(result.score, 2);
                    assert_eq!(result.total, 2);
                    return;
                }
                QuizOutcome::Aborted => panic!("not aborted"),
            }
        }
        panic!("session should have finished");
    }

    #[tokio::test]
    async fn abort_prompt_blocks_selection_until_dismissed() {
        let (mut vm, workflow) = vm_and_workflow().await;
        let entry = entry();

        vm.apply(&workflow, &entry, QuizIntent::RequestAbort)
            .await
            .unwrap();
        assert!(vm.abort_prompt_open());

        vm.apply(&workflow, &entry, QuizIntent::SelectOption(0))
            .await
            .unwrap();
        assert!(vm.session().records().is_empty());

        vm.apply(&workflow, &entry, QuizIntent::DismissAbort)
            .await
            .unwrap();
        assert!(!vm.abort_prompt_open());

        vm.apply(&workflow, &entry, QuizIntent::SelectOption(0))
            .await
            .unwrap();
        assert_eq!(vm.session().records().len(), 1);
    }

    #[tokio::test]
    async fn confirm_abort_reports_aborted() {
        let (mut vm, workflow) = vm_and_workflow().await;
        let entry = entry();

        vm.apply(&workflow, &entry, QuizIntent::RequestAbort)
            .await
            .unwrap();
        let outcome = vm
            .apply(&workflow, &entry, QuizIntent::ConfirmAbort)
            .await
            .unwrap();
        assert_eq!(outcome, QuizOutcome::Aborted);
        assert!(vm.session().is_finished());
    }

    #[tokio::test]
    async fn ticks_expire_into_a_result() {
        let (mut vm, workflow) = vm_and_workflow().await;
        let entry = entry();

        // 2 questions at 1 minute: 60 seconds on the clock.
        assert_eq!(vm.session().seconds_remaining(), 60);
        for _ in 0..59 {
            let outcome = vm.apply(&workflow, &entry, QuizIntent::Tick).await.unwrap();
            assert_eq!(outcome, QuizOutcome::Continue);
        }
        let outcome = vm.apply(&workflow, &entry, QuizIntent::Tick).await.unwrap();
        let QuizOutcome::Finished(result) = outcome else {
            panic!("expiry should finish the session");
        };
        assert_eq!(result.score, 0);
        assert!(result.records.is_empty());
    }
}
