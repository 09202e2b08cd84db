//! Assembling a pipeline from a [`RunConfig`]

use super::executor::Pipeline;
use crate::concurrency::ConcurrencyGate;
use crate::config::{RunConfig, load_models_file};
use crate::dataset::{FsDocumentSource, QuestionRecord, load_questions};
use crate::error::EvalResult;
use crate::llm::ChatCompletion;
use crate::runner::TaskRunner;
use crate::store::{HEADER_WIDTH, ResultStore};
use crate::tokens::{TokenBudget, Tokenizer};
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// What a run will do, decided before any file is written
#[derive(Debug)]
pub enum RunPlan {
    /// No pending question and no existing result file
    NothingToDo { result_path: PathBuf },
    Ready {
        pipeline: Box<Pipeline>,
        questions: Vec<QuestionRecord>,
    },
}

/// Load models, dataset and the result file for `config`.
///
/// Missing models are configuration errors raised before anything is
/// written. When nothing is pending and the result file does not exist yet,
/// no file is created.
pub fn plan_run(
    config: &RunConfig,
    client: Arc<dyn ChatCompletion>,
    tokenizer: Arc<dyn Tokenizer>,
    now: DateTime<Local>,
) -> EvalResult<RunPlan> {
    let models = load_models_file(&config.models_path)?;
    let model = models.get(&config.model_id)?.clone();
    let judge_model = models.get(&config.judge_model_id)?.clone();

    let result_path = config.result_path(now);
    let questions = load_questions(&config.dataset_path)?;

    let scan = ResultStore::scan(&result_path)?;
    let pending = questions
        .iter()
        .filter(|question| !scan.done_ids.contains(question.id.trim()))
        .count();
    let pending = config.num_tasks.map_or(pending, |limit| pending.min(limit));
    if pending == 0 && !result_path.exists() {
        info!(path = %result_path.display(), "nothing to run");
        return Ok(RunPlan::NothingToDo { result_path });
    }

    let store = ResultStore::open(&result_path, HEADER_WIDTH)?;
    let runner = TaskRunner::new(
        client,
        Arc::new(FsDocumentSource::new(&config.documents_root)),
        TokenBudget::new(tokenizer, config.context_length),
        ConcurrencyGate::new(config.max_concurrency),
        model,
        judge_model,
        config.retries,
    );
    let pipeline = Pipeline::new(runner, store).with_limit(config.num_tasks);

    Ok(RunPlan::Ready {
        pipeline: Box::new(pipeline),
        questions,
    })
}
