//! Shared error types for the services crate.

use std::path::PathBuf;
use thiserror::Error;

use omni_core::model::ReorderError;
use storage::repository::StorageError;

/// Errors emitted while loading or generating catalog data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot resolve {segment} against the data base URL")]
    InvalidUrl { segment: String },

    #[error("malformed document {name}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document {name}")]
    Invalid {
        name: String,
        #[source]
        source: omni_core::Error,
    },
}

/// Errors emitted by the session engine and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("session already finished")]
    Finished,

    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
