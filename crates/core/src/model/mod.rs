mod catalog;
mod history;
mod ids;
mod question;
mod session;

pub use ids::SetId;

pub use catalog::{CatalogEntry, MetadataError, QuestionSet, SetMetadata};
pub use history::{AttemptRecord, MAX_ATTEMPTS_PER_SET, score_percentage};
pub use question::{AnswerKey, Question, QuestionError, Selection};
pub use session::{
    AnswerRecord, ReorderError, SessionMode, SessionQuestion, time_budget_secs,
};
