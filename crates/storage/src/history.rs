use std::collections::BTreeMap;
use std::sync::Arc;

use omni_core::model::{AttemptRecord, MAX_ATTEMPTS_PER_SET, SetId};

use crate::repository::{KeyValueStore, StorageError};

/// Fixed slot under which per-set attempt history is persisted.
pub const HISTORY_KEY: &str = "g_test_history";

/// Append-only, capped log of past attempts, keyed by set id.
///
/// Lists are newest first and truncated to [`MAX_ATTEMPTS_PER_SET`] on every
/// append. A malformed stored value reads as empty and is replaced by the
/// next write.
#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All recorded history, keyed by set id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures.
    pub async fn all(&self) -> Result<BTreeMap<SetId, Vec<AttemptRecord>>, StorageError> {
        let Some(raw) = self.store.get(HISTORY_KEY).await? else {
            return Ok(BTreeMap::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    /// Recent attempts for one set, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures.
    pub async fn for_set(&self, set_id: &SetId) -> Result<Vec<AttemptRecord>, StorageError> {
        let mut all = self.all().await?;
        Ok(all.remove(set_id).unwrap_or_default())
    }

    /// Prepend an attempt for `set_id`, keeping the most recent entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn append(&self, set_id: &SetId, record: AttemptRecord) -> Result<(), StorageError> {
        let mut all = self.all().await?;
        let attempts = all.entry(set_id.clone()).or_default();
        attempts.insert(0, record);
        attempts.truncate(MAX_ATTEMPTS_PER_SET);

        let json =
            serde_json::to_string(&all).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(HISTORY_KEY, &json).await
    }
}
