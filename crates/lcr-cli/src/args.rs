//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use lcr_core::config::{
    DEFAULT_CONTEXT_LENGTH_TOKENS, DEFAULT_DATASET_PATH, DEFAULT_DOCUMENTS_ROOT,
    DEFAULT_JUDGE_MODEL_ID, DEFAULT_MAX_CONCURRENCY, DEFAULT_MODELS_PATH, DEFAULT_RETRIES,
};
use lcr_core::RunConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lcr-bench")]
#[command(about = "LCR Bench - long-context reading benchmark runner")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run (or resume) a benchmark
    Run(RunArgs),

    /// List the models defined in the models file
    Models {
        /// Path to the models file
        #[arg(long, default_value = DEFAULT_MODELS_PATH)]
        models: PathBuf,
    },
}

/// Token counter used for budgeting
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenizerArg {
    /// Four characters per token estimate
    Chars,
    /// Exact cl100k_base encoding (requires the `tiktoken` feature)
    Cl100k,
}

impl TokenizerArg {
    /// Exact counts when the encoder is compiled in, the estimate otherwise
    pub const DEFAULT: Self = if cfg!(feature = "tiktoken") {
        Self::Cl100k
    } else {
        Self::Chars
    };
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Model under test, as named in the models file
    #[arg(long, default_value = DEFAULT_JUDGE_MODEL_ID)]
    pub model_id: String,

    /// Judge model, as named in the models file
    #[arg(long, default_value = DEFAULT_JUDGE_MODEL_ID)]
    pub judge_model_id: String,

    /// Launch at most this many pending questions
    #[arg(long)]
    pub num_tasks: Option<usize>,

    /// Result file; resumed when it already exists
    #[arg(long)]
    pub save_to: Option<PathBuf>,

    /// Maximum number of model calls in flight
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Attempts per model call
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// Context window used for token budgeting
    #[arg(long, default_value_t = DEFAULT_CONTEXT_LENGTH_TOKENS)]
    pub context_length: usize,

    /// Path to the models file
    #[arg(long, default_value = DEFAULT_MODELS_PATH)]
    pub models: PathBuf,

    /// Path to the question CSV
    #[arg(long, default_value = DEFAULT_DATASET_PATH)]
    pub dataset: PathBuf,

    /// Root of the extracted document texts
    #[arg(long, default_value = DEFAULT_DOCUMENTS_ROOT)]
    pub documents_root: PathBuf,

    /// Token counter used for budgeting
    #[arg(long, value_enum, default_value_t = TokenizerArg::DEFAULT)]
    pub tokenizer: TokenizerArg,
}

impl RunArgs {
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            model_id: self.model_id.clone(),
            judge_model_id: self.judge_model_id.clone(),
            models_path: self.models.clone(),
            dataset_path: self.dataset.clone(),
            documents_root: self.documents_root.clone(),
            save_to: self.save_to.clone(),
            num_tasks: self.num_tasks,
            max_concurrency: self.max_concurrency,
            retries: self.retries,
            context_length: self.context_length,
        }
    }
}
