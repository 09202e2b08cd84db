//! LCR Bench core
//!
//! Long-context reading benchmark harness: runs a model over question sets
//! backed by document collections, grades every answer with a judge model
//! and keeps a resumable JSONL result file with a live statistics header.
//!
//! # Features
//!
//! - **Bounded concurrency**: one [`ConcurrencyGate`] shared by task and
//!   judge calls
//! - **Token budgeting**: oversized tasks are skipped before any network call
//! - **Streaming client**: OpenAI-compatible SSE completions with
//!   exponential-backoff retries
//! - **Resumable store**: already-graded questions are never run twice
//!
//! # Example
//!
//! ```rust,ignore
//! use lcr_core::{CompletionClient, CharRatioTokenizer, RunConfig, RunPlan, plan_run};
//!
//! let config = RunConfig::new("my-model");
//! let plan = plan_run(
//!     &config,
//!     Arc::new(CompletionClient::new()?),
//!     Arc::new(CharRatioTokenizer::new()),
//!     chrono::Local::now(),
//! )?;
//! if let RunPlan::Ready { mut pipeline, questions } = plan {
//!     let summary = pipeline.run(&questions, &CancellationToken::new(), None).await?;
//! }
//! ```

pub mod concurrency;
pub mod config;
pub mod dataset;
pub mod error;
pub mod judge;
pub mod llm;
pub mod pipeline;
pub mod runner;
pub mod store;
pub mod tokens;

// Re-exports for convenience
pub use concurrency::ConcurrencyGate;
pub use config::{ModelEndpointConfig, ModelRegistry, RunConfig};
pub use dataset::{DocumentSource, FsDocumentSource, QuestionRecord};
pub use error::{ErrorKind, EvalError, EvalResult};
pub use judge::{Judge, JudgeVerdict, normalize_judge_result};
pub use llm::{ChatCompletion, CompletionClient, CompletionOutcome, RetryPolicy, TokenUsage};
pub use pipeline::{Pipeline, PipelineEvent, ProgressCallback, RunPlan, RunSummary, plan_run};
pub use runner::{TaskOutcome, TaskRunner};
pub use store::{HEADER_WIDTH, RecordVerdict, ResultRecord, ResultStore, StatsHeader};
#[cfg(feature = "tiktoken")]
pub use tokens::TiktokenTokenizer;
pub use tokens::{CharRatioTokenizer, TokenBudget, Tokenizer};
