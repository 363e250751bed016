#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod sessions;

pub use omni_core::Clock;

pub use catalog::{CatalogService, CatalogSource};
pub use error::{CatalogError, SessionError};
pub use sessions::{
    AdvanceOutcome, QuestionPhase, QuizSession, SelectionOutcome, SessionBuilder,
    SessionProgress, SessionWorkflow, TickOutcome,
};
