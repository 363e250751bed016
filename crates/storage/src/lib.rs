#![forbid(unsafe_code)]

pub mod history;
pub mod repository;
pub mod session;
pub mod sqlite;

pub use history::HistoryStore;
pub use repository::{InMemoryKeyValueStore, KeyValueStore, StorageError};
pub use session::{SessionSnapshot, SessionStore};
