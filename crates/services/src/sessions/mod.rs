mod build;
mod progress;
mod session;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use build::SessionBuilder;
pub use progress::SessionProgress;
pub use session::{AdvanceOutcome, QuestionPhase, QuizSession, SelectionOutcome, TickOutcome};
pub use workflow::SessionWorkflow;
