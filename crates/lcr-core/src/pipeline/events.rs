//! Progress events and run summary

use crate::llm::TokenUsage;
use crate::store::{RecordVerdict, StatsHeader};
use std::path::PathBuf;

/// Callback for progress updates during a run
pub type ProgressCallback = Box<dyn Fn(PipelineEvent) + Send + Sync>;

/// Progress update emitted by the draining loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// All units launched
    Started { total: usize },
    /// A record was persisted
    Recorded {
        question_id: String,
        verdict: RecordVerdict,
        completed: usize,
        total: usize,
        failed: usize,
        stats: StatsHeader,
    },
    /// A task ended in `ERROR`; nothing was persisted
    Failed {
        question_id: String,
        error: String,
        completed: usize,
        total: usize,
        failed: usize,
    },
}

/// Outcome of [`Pipeline::run`](super::Pipeline::run)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub result_path: PathBuf,
    /// Units launched
    pub launched: usize,
    /// Records written to the store
    pub persisted: usize,
    /// Units that ended in `ERROR`
    pub failed: usize,
    /// Header counters after the run
    pub stats: StatsHeader,
    /// Summed usage of every successful grading call
    pub judge_usage: TokenUsage,
    pub interrupted: bool,
}

impl RunSummary {
    /// Units that never reached the drain (only after an interrupt)
    pub fn abandoned(&self) -> usize {
        self.launched.saturating_sub(self.persisted + self.failed)
    }
}
