use thiserror::Error;

use crate::model::{MetadataError, QuestionError, ReorderError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
}
