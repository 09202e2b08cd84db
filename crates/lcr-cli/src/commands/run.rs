//! `lcr-bench run`

use crate::RunStatus;
use crate::args::{RunArgs, TokenizerArg};
use crate::console;
use crate::progress::RunProgress;
use crate::signal_handler::InterruptListener;
use anyhow::{Context, Result};
use chrono::Local;
use lcr_core::{
    CharRatioTokenizer, CompletionClient, RunPlan, RunSummary, Tokenizer, plan_run,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn build_tokenizer(choice: TokenizerArg) -> Result<Arc<dyn Tokenizer>> {
    match choice {
        TokenizerArg::Chars => Ok(Arc::new(CharRatioTokenizer::new())),
        #[cfg(feature = "tiktoken")]
        TokenizerArg::Cl100k => Ok(Arc::new(lcr_core::TiktokenTokenizer::cl100k()?)),
        #[cfg(not(feature = "tiktoken"))]
        TokenizerArg::Cl100k => {
            anyhow::bail!("--tokenizer cl100k requires building with the `tiktoken` feature")
        }
    }
}

/// Run or resume a benchmark
pub async fn execute(args: RunArgs) -> Result<RunStatus> {
    let config = args.to_run_config();
    let tokenizer = build_tokenizer(args.tokenizer)?;
    let client = Arc::new(CompletionClient::new()?);

    let plan = plan_run(&config, client, tokenizer, Local::now())
        .context("Failed to prepare the run")?;
    let (mut pipeline, questions) = match plan {
        RunPlan::NothingToDo { result_path } => {
            console::info(&format!(
                "Nothing to run and no result file at {}",
                result_path.display()
            ));
            return Ok(RunStatus::Completed);
        }
        RunPlan::Ready {
            pipeline,
            questions,
        } => (pipeline, questions),
    };

    let pending = pipeline.pending(&questions).len();
    console::info(&format!(
        "{} of {} questions pending, writing to {}",
        pending,
        questions.len(),
        pipeline.store().path().display()
    ));

    let cancel = CancellationToken::new();
    let listener = InterruptListener::spawn(cancel.clone())?;
    let progress = RunProgress::new(pending as u64);
    let callback = progress.callback();

    let result = pipeline.run(&questions, &cancel, Some(&callback)).await;
    listener.shutdown().await;
    progress.finish();

    let summary = result?;
    print_summary(&summary);
    Ok(if summary.interrupted {
        RunStatus::Interrupted
    } else {
        RunStatus::Completed
    })
}

fn print_summary(summary: &RunSummary) {
    if summary.interrupted {
        console::warn(&format!(
            "Interrupted: {} tasks abandoned, completed results are kept",
            summary.abandoned()
        ));
    }
    console::success(&format!(
        "Accuracy {} ({}/{}), {} new, {} failed",
        summary.stats.accuracy_label(),
        summary.stats.correct,
        summary.stats.total,
        summary.persisted,
        summary.failed
    ));
    console::info(&format!(
        "Judge usage: {} tokens ({} prompt + {} completion)",
        summary.judge_usage.total_tokens(),
        summary.judge_usage.prompt_tokens,
        summary.judge_usage.completion_tokens
    ));
    console::info(&format!("Results: {}", summary.result_path.display()));
}
