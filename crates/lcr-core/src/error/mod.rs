//! Error types for LCR Bench
//!
//! Failures are classified by [`ErrorKind`] so that a failed task can be
//! reported as `"<kind>: <message>"` without losing which part of the
//! taxonomy it came from:
//! - configuration errors abort the run before any task executes
//! - transient call failures are retried by the completion client
//! - terminal call failures end a single task as `ERROR`
//! - corrupt lines are skipped while scanning an existing result file

mod constructors;
mod types;

pub use types::{ErrorKind, EvalError, EvalResult};
