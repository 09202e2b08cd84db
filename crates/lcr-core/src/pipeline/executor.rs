//! Concurrent execution and completion-order drain

use super::events::{PipelineEvent, ProgressCallback, RunSummary};
use crate::dataset::QuestionRecord;
use crate::error::{EvalError, EvalResult};
use crate::runner::{TaskOutcome, TaskRunner};
use crate::store::{ResultRecord, ResultStore};
use std::collections::HashMap;
use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Drives a [`TaskRunner`] over the pending questions of a [`ResultStore`]
#[derive(Debug)]
pub struct Pipeline {
    runner: TaskRunner,
    store: ResultStore,
    limit: Option<usize>,
}

impl Pipeline {
    pub fn new(runner: TaskRunner, store: ResultStore) -> Self {
        Self {
            runner,
            store,
            limit: None,
        }
    }

    /// Launch at most `limit` pending questions
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// `questions` minus the ones already in the store, truncated to the limit
    pub fn pending(&self, questions: &[QuestionRecord]) -> Vec<QuestionRecord> {
        let mut pending = self.store.pending(questions);
        if let Some(limit) = self.limit {
            pending.truncate(limit);
        }
        pending
    }

    /// Run every pending question and persist the results.
    ///
    /// Task failures never abort the run; only a store write failure does.
    /// When `cancel` fires the gate is closed, outstanding units are aborted
    /// and the summary comes back with `interrupted` set.
    pub async fn run(
        &mut self,
        questions: &[QuestionRecord],
        cancel: &CancellationToken,
        progress: Option<&ProgressCallback>,
    ) -> EvalResult<RunSummary> {
        let emit = |event: PipelineEvent| {
            if let Some(callback) = progress {
                callback(event);
            }
        };

        let pending = self.pending(questions);
        let total = pending.len();
        let mut summary = RunSummary {
            result_path: self.store.path().to_path_buf(),
            launched: total,
            stats: self.store.stats(),
            ..Default::default()
        };

        info!(
            model = %self.runner.model().model_id,
            pending = total,
            done = self.store.done_ids().len(),
            "run started"
        );

        let mut join_set = JoinSet::new();
        let mut in_flight: HashMap<Id, QuestionRecord> = HashMap::with_capacity(total);
        for question in pending {
            let runner = self.runner.clone();
            let task_question = question.clone();
            let handle = join_set.spawn(async move { runner.run(&task_question).await });
            in_flight.insert(handle.id(), question);
        }
        emit(PipelineEvent::Started { total });

        let mut completed = 0;
        loop {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    summary.interrupted = true;
                    break;
                }
                joined = join_set.join_next_with_id() => joined,
            };
            let Some(joined) = joined else {
                break;
            };

            let outcome = match joined {
                Ok((id, outcome)) => {
                    in_flight.remove(&id);
                    outcome
                }
                Err(e) => {
                    let error = if e.is_cancelled() {
                        EvalError::Cancelled
                    } else {
                        EvalError::internal(format!("task panicked: {}", e))
                    };
                    let question = in_flight.remove(&e.id()).unwrap_or_default();
                    TaskOutcome {
                        record: ResultRecord::failed(&question, &error),
                        judge_usage: None,
                    }
                }
            };
            completed += 1;

            if let Some(usage) = outcome.judge_usage {
                summary.judge_usage.add(usage);
            }

            let record = outcome.record;
            if record.is_error() {
                summary.failed += 1;
                emit(PipelineEvent::Failed {
                    question_id: record.question_id.clone(),
                    error: record.error.clone().unwrap_or_default(),
                    completed,
                    total,
                    failed: summary.failed,
                });
                continue;
            }

            if let Err(e) = self.store.append(&record) {
                join_set.abort_all();
                self.runner.gate().close();
                return Err(e);
            }
            summary.persisted += 1;
            emit(PipelineEvent::Recorded {
                question_id: record.question_id.clone(),
                verdict: record.judge_result,
                completed,
                total,
                failed: summary.failed,
                stats: self.store.stats(),
            });
        }

        if summary.interrupted {
            self.runner.gate().close();
            join_set.abort_all();
            warn!(abandoned = in_flight.len(), "run interrupted");
        }

        summary.stats = self.store.stats();
        info!(
            persisted = summary.persisted,
            failed = summary.failed,
            correct = summary.stats.correct,
            total = summary.stats.total,
            interrupted = summary.interrupted,
            "run finished"
        );
        Ok(summary)
    }
}
