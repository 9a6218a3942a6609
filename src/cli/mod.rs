//! Command-line interface for draftsync.

pub mod args;
mod commands;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::app::{App, AppError};

pub use args::{GlobalArgs, OutputSink};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during CLI execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument processing error.
    #[error("{0}")]
    Args(#[from] args::ArgsError),

    /// App error.
    #[error("{0}")]
    App(#[from] AppError),

    /// Sync error.
    #[error("{0}")]
    Sync(#[from] crate::sync::SyncError),

    /// Catalog error.
    #[error("{0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

// =============================================================================
// CLI Definition
// =============================================================================

/// draftsync - sync writing-studio catalogs with a remote document store.
#[derive(Parser, Debug)]
#[command(name = "dsync", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull remote catalog documents into local catalogs.
    Pull(commands::pull::PullArgs),

    /// Publish one local item to the remote store.
    Push(commands::push::PushArgs),

    /// List local catalogs and their item counts.
    Catalogs(commands::catalogs::CatalogsArgs),
}

// =============================================================================
// CLI Execution
// =============================================================================

impl Cli {
    /// Parse command-line arguments and return the CLI instance.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let app = App::new(self.global.to_app_context())?;

        match self.command {
            Command::Pull(args) => args.run(&app, &self.global).await,
            Command::Push(args) => args.run(&app, &self.global).await,
            Command::Catalogs(args) => args.run(&app, &self.global).await,
        }
    }
}

/// Main entry point for the CLI.
pub async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.run().await
}
