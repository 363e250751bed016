mod home_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use home_vm::{AttemptVm, CategoryVm, map_attempts, map_categories};
pub use quiz_vm::{QuizIntent, QuizOutcome, QuizVm};
pub use result_vm::{CategoryStat, QuizResult, category_breakdown};
pub use time_fmt::{format_attempt_date, format_clock};
