//! Per-question execution

mod prompt;
mod task;

pub use prompt::build_task_prompt;
pub use task::{TaskOutcome, TaskRunner};
