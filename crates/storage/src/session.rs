use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use omni_core::model::{AnswerRecord, SessionMode, SessionQuestion, SetId};

use crate::repository::{KeyValueStore, StorageError};

/// Fixed slot under which the live session snapshot is persisted.
pub const SESSION_SLOT_KEY: &str = "quiz_session";

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SnapshotMode {
    Full,
    Category,
}

/// Persisted shape of a running session.
///
/// This mirrors the live session so the engine can be rebuilt after a
/// restart without leaking storage concerns into the domain layer. The
/// transient working selection of a multi-answer question is intentionally
/// not part of the snapshot; only graded state survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub set_id: SetId,
    mode: SnapshotMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    pub questions: Vec<SessionQuestion>,
    pub current_index: usize,
    pub score: u32,
    pub history: Vec<AnswerRecord>,
    pub time_left: u32,
    /// When this snapshot was written.
    pub timestamp: DateTime<Utc>,
}

impl SessionSnapshot {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        set_id: SetId,
        mode: &SessionMode,
        questions: Vec<SessionQuestion>,
        current_index: usize,
        score: u32,
        history: Vec<AnswerRecord>,
        time_left: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let (mode, category) = match mode {
            SessionMode::Full => (SnapshotMode::Full, None),
            SessionMode::Category(name) => (SnapshotMode::Category, Some(name.clone())),
        };
        Self {
            set_id,
            mode,
            category,
            questions,
            current_index,
            score,
            history,
            time_left,
            timestamp,
        }
    }

    /// The session mode this snapshot was taken under.
    ///
    /// A category snapshot whose category name went missing degrades to a
    /// full session rather than failing the restore.
    #[must_use]
    pub fn session_mode(&self) -> SessionMode {
        match (self.mode, self.category.as_ref()) {
            (SnapshotMode::Category, Some(name)) => SessionMode::Category(name.clone()),
            _ => SessionMode::Full,
        }
    }
}

//
// ─── SESSION STORE ─────────────────────────────────────────────────────────────
//

/// Typed access to the single persisted-session slot.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted snapshot, if a well-formed one exists.
    ///
    /// A malformed payload (parse failure, missing fields) reads as absent;
    /// the stale entry is left in place and overwritten by the next save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures, never for bad data.
    pub async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(raw) = self.store.get(SESSION_SLOT_KEY).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Overwrite the slot with a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(SESSION_SLOT_KEY, &json).await
    }

    /// Delete the slot (on finish or abort).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.delete(SESSION_SLOT_KEY).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryKeyValueStore;
    use omni_core::model::{AnswerKey, Question, SessionQuestion};
    use omni_core::time::fixed_now;

    fn snapshot() -> SessionSnapshot {
        let question = Question {
            major_category: "General".to_owned(),
            sub_category: None,
            question: "Q?".to_owned(),
            table: None,
            options: vec!["a".into(), "b".into()],
            answer: AnswerKey::Single(1),
            explanation: "because".to_owned(),
        };
        let session_question = SessionQuestion::reorder(&question, &[1, 0]).unwrap();
        SessionSnapshot::new(
            SetId::new("mock"),
            &SessionMode::Category("General".to_owned()),
            vec![session_question],
            0,
            0,
            Vec::new(),
            120,
            fixed_now(),
        )
    }

    #[tokio::test]
    async fn snapshot_round_trips() {
        let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(store.load().await.unwrap(), None);

        let snap = snapshot();
        store.save(&snap).await.unwrap();
        let restored = store.load().await.unwrap().expect("snapshot present");
        assert_eq!(restored, snap);
        assert_eq!(
            restored.session_mode(),
            SessionMode::Category("General".to_owned())
        );

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_snapshot_reads_as_absent() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.set(SESSION_SLOT_KEY, "{not json").await.unwrap();

        let store = SessionStore::new(kv);
        assert_eq!(store.load().await.unwrap(), None);
    }
}
