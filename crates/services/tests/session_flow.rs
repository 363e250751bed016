use std::sync::Arc;

use omni_core::model::{
    AnswerKey, CatalogEntry, Question, QuestionSet, SessionMode, SetId, SetMetadata,
};
use omni_core::time::fixed_clock;
use services::{AdvanceOutcome, SelectionOutcome, SessionWorkflow, TickOutcome};
use storage::repository::{InMemoryKeyValueStore, KeyValueStore};
use storage::{HistoryStore, SessionStore};

fn question(category: &str, text: &str, answer: AnswerKey) -> Question {
    Question {
        major_category: category.to_owned(),
        sub_category: None,
        question: text.to_owned(),
        table: None,
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        answer,
        explanation: "n/a".to_owned(),
    }
}

fn set() -> QuestionSet {
    QuestionSet {
        metadata: SetMetadata {
            title: "Flow Exam".to_owned(),
            description: String::new(),
            total_questions: 3,
            time_limit: 10,
            pass_line: 60,
        },
        questions: vec![
            question("Networking", "n1", AnswerKey::Single(2)),
            question("Security", "s1", AnswerKey::Multiple(vec![1, 3])),
            question("Networking", "n2", AnswerKey::Single(0)),
        ],
    }
}

fn entry() -> CatalogEntry {
    CatalogEntry::from_metadata(SetId::new("flow"), "flow.json", &set().metadata)
}

fn workflow(kv: Arc<dyn KeyValueStore>) -> SessionWorkflow {
    SessionWorkflow::new(
        fixed_clock(),
        SessionStore::new(Arc::clone(&kv)),
        HistoryStore::new(kv),
    )
    .with_seed(11)
}

/// Answer the current question correctly, whatever the shuffled order is.
async fn answer_correctly(workflow: &SessionWorkflow, session: &mut services::QuizSession) {
    let answer = session.current_question().unwrap().answer.clone();
    match answer {
        AnswerKey::Single(index) => {
            let outcome = workflow.select_option(session, index).await.unwrap();
            assert_eq!(outcome, SelectionOutcome::Graded { is_correct: true });
        }
        AnswerKey::Multiple(indices) => {
            for index in indices {
                let outcome = workflow.select_option(session, index).await.unwrap();
                assert_eq!(outcome, SelectionOutcome::Toggled);
            }
            assert_eq!(workflow.confirm_selection(session).await.unwrap(), Some(true));
        }
    }
}

#[tokio::test]
async fn full_run_records_attempt_and_clears_slot() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let workflow = workflow(Arc::clone(&kv));
    let entry = entry();
    let set = set();

    let mut session = workflow
        .start_or_resume(&entry, &set, SessionMode::Full)
        .await
        .unwrap();
    assert_eq!(session.total(), 3);

    while !session.is_finished() {
        answer_correctly(&workflow, &mut session).await;
        workflow.advance(&mut session, &entry).await.unwrap();
    }

    let attempts = workflow.attempts_for(&entry).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].score, 3);
    assert_eq!(attempts[0].total, 3);
    assert_eq!(attempts[0].percentage, 100);
    assert!(attempts[0].is_passed);

    // Finishing removed the persisted snapshot.
    assert_eq!(kv.get("quiz_session").await.unwrap(), None);
}

#[tokio::test]
async fn mid_run_session_resumes_verbatim() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let workflow = workflow(Arc::clone(&kv));
    let entry = entry();
    let set = set();

    let mut session = workflow
        .start_or_resume(&entry, &set, SessionMode::Full)
        .await
        .unwrap();
    answer_correctly(&workflow, &mut session).await;
    workflow.advance(&mut session, &entry).await.unwrap();
    workflow.tick(&mut session, &entry).await.unwrap();
    workflow.tick(&mut session, &entry).await.unwrap();

    // A second startup against the same storage restores the run exactly.
    let restored = workflow
        .start_or_resume(&entry, &set, SessionMode::Full)
        .await
        .unwrap();
    assert_eq!(restored.current_index(), session.current_index());
    assert_eq!(restored.score(), session.score());
    assert_eq!(restored.records(), session.records());
    assert_eq!(restored.seconds_remaining(), session.seconds_remaining());
    assert_eq!(restored.questions(), session.questions());
}

#[tokio::test]
async fn snapshot_for_another_set_is_ignored() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let workflow = workflow(Arc::clone(&kv));
    let entry = entry();
    let set = set();

    let mut session = workflow
        .start_or_resume(&entry, &set, SessionMode::Full)
        .await
        .unwrap();
    answer_correctly(&workflow, &mut session).await;

    let mut other = entry.clone();
    other.id = SetId::new("another");
    let fresh = workflow
        .start_or_resume(&other, &set, SessionMode::Full)
        .await
        .unwrap();
    assert_eq!(fresh.current_index(), 0);
    assert!(fresh.records().is_empty());
}

#[tokio::test]
async fn expiry_finishes_with_partial_answers() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let workflow = workflow(Arc::clone(&kv));
    let entry = entry();
    let set = set();

    let mut session = workflow
        .start_or_resume(&entry, &set, SessionMode::Category("Networking".to_owned()))
        .await
        .unwrap();
    assert_eq!(session.total(), 2);
    // round(600 * 2 / 3) = 400 seconds for the category subset.
    assert_eq!(session.seconds_remaining(), 400);

    answer_correctly(&workflow, &mut session).await;
    workflow.advance(&mut session, &entry).await.unwrap();

    let mut outcome = TickOutcome::Continue;
    while outcome == TickOutcome::Continue {
        outcome = workflow.tick(&mut session, &entry).await.unwrap();
    }
    assert_eq!(outcome, TickOutcome::Expired);
    assert!(session.is_finished());

    // The unanswered second question is simply absent from the attempt.
    let attempts = workflow.attempts_for(&entry).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].score, 1);
    assert_eq!(attempts[0].total, 2);
    assert_eq!(kv.get("quiz_session").await.unwrap(), None);
}

#[tokio::test]
async fn abort_clears_slot_without_history() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let workflow = workflow(Arc::clone(&kv));
    let entry = entry();
    let set = set();

    let mut session = workflow
        .start_or_resume(&entry, &set, SessionMode::Full)
        .await
        .unwrap();
    answer_correctly(&workflow, &mut session).await;

    workflow.abort(&mut session).await.unwrap();
    assert!(session.is_finished());
    assert_eq!(kv.get("quiz_session").await.unwrap(), None);
    assert!(workflow.attempts_for(&entry).await.unwrap().is_empty());

    // Aborted sessions take no further writes.
    assert_eq!(
        workflow.select_option(&mut session, 0).await.unwrap(),
        SelectionOutcome::Ignored
    );
    assert_eq!(
        workflow.advance(&mut session, &entry).await.unwrap(),
        AdvanceOutcome::Ignored
    );
    assert_eq!(kv.get("quiz_session").await.unwrap(), None);
}

#[tokio::test]
async fn pending_resume_skips_missing_catalog_entries() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
    let workflow = workflow(Arc::clone(&kv));
    let entry = entry();
    let set = set();

    assert!(workflow.pending_resume(&[entry.clone()]).await.unwrap().is_none());

    let mode = SessionMode::Category("Security".to_owned());
    workflow
        .start_or_resume(&entry, &set, mode.clone())
        .await
        .unwrap();

    let (found, found_mode) = workflow
        .pending_resume(std::slice::from_ref(&entry))
        .await
        .unwrap()
        .expect("resumable session");
    assert_eq!(found.id, entry.id);
    assert_eq!(found_mode, mode);

    // Same snapshot against a catalog without the set: silently skipped.
    assert!(workflow.pending_resume(&[]).await.unwrap().is_none());
}
