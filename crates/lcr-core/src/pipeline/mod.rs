//! Evaluation pipeline
//!
//! Launches one unit of work per pending question, drains them in
//! completion order and feeds every terminal record to the
//! [`ResultStore`](crate::store::ResultStore), which is only ever touched by
//! the draining loop.

mod events;
mod executor;
mod setup;

pub use events::{PipelineEvent, ProgressCallback, RunSummary};
pub use executor::Pipeline;
pub use setup::{RunPlan, plan_run};
