use std::sync::Arc;

use omni_core::model::{AttemptRecord, SetId};
use omni_core::time::fixed_now;
use storage::repository::KeyValueStore;
use storage::sqlite::SqliteKeyValueStore;
use storage::{HistoryStore, SessionStore};

#[tokio::test]
async fn sqlite_kv_round_trips_and_overwrites() {
    let store = SqliteKeyValueStore::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.get("quiz_session").await.unwrap(), None);

    store.set("quiz_session", r#"{"a":1}"#).await.unwrap();
    assert_eq!(
        store.get("quiz_session").await.unwrap().as_deref(),
        Some(r#"{"a":1}"#)
    );

    store.set("quiz_session", r#"{"a":2}"#).await.unwrap();
    assert_eq!(
        store.get("quiz_session").await.unwrap().as_deref(),
        Some(r#"{"a":2}"#)
    );

    store.delete("quiz_session").await.unwrap();
    assert_eq!(store.get("quiz_session").await.unwrap(), None);
}

#[tokio::test]
async fn typed_stores_share_one_sqlite_backend() {
    let store = SqliteKeyValueStore::connect("sqlite:file:memdb_typed?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");
    let kv: Arc<dyn KeyValueStore> = Arc::new(store);

    let sessions = SessionStore::new(Arc::clone(&kv));
    assert_eq!(sessions.load().await.unwrap(), None);

    let history = HistoryStore::new(kv);
    let set_id = SetId::new("mock");
    history
        .append(&set_id, AttemptRecord::new(fixed_now(), 3, 4, 60))
        .await
        .unwrap();

    let attempts = history.for_set(&set_id).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].percentage, 75);
    assert!(attempts[0].is_passed);
}
