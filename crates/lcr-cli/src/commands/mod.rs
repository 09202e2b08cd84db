//! Command implementations

pub mod models;
pub mod run;

use crate::RunStatus;
use crate::args::{Cli, Commands};
use anyhow::Result;

/// Dispatch the parsed command line
pub async fn route(cli: Cli) -> Result<RunStatus> {
    match cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Models { models } => {
            models::list(&models)?;
            Ok(RunStatus::Completed)
        }
    }
}
