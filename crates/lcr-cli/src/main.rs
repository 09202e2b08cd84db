//! LCR Bench CLI
//!
//! Runs a model over the long-context reading benchmark and grades every
//! answer with a judge model.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/lcr-cli
//! ```
//!
//! # Usage
//!
//! ```bash
//! lcr-bench run --model-id my-model                 # full run, new result file
//! lcr-bench run --model-id my-model --save-to r.jsonl   # resume into r.jsonl
//! lcr-bench models                                  # list configured models
//! ```
//!
//! Set `RUST_LOG` to override the log filter (default `warn`, `info` with
//! `--verbose`). Exit code is 130 when the run was interrupted.

mod args;
mod commands;
mod console;
mod progress;
mod signal_handler;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use args::Cli;

/// Exit code after an external interrupt
const EXIT_INTERRUPTED: u8 = 130;

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Interrupted,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::route(cli).await {
        Ok(RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(RunStatus::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            console::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
