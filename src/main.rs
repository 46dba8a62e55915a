//! MontageCut
//!
//! A command-line tool that assembles a gameplay highlight montage plan
//! from a folder of named clips and a music track.
//!
//! # Usage
//!
//! ```bash
//! montagecut build --clips ./clips --song ./song.mp3
//! montagecut build --clips ./clips --song ./song.mp3 --quick --json
//! montagecut parse --clips ./clips
//! montagecut validate --clips ./clips
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use montagecut::cli::{commands, Cli, Commands};

/// Main entry point for the MontageCut application
fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins when set; otherwise fall back to --log-level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Build(args) => {
            info!("Executing build command");
            commands::execute_build(args)?;
        }
        Commands::Parse(args) => {
            info!("Executing parse command");
            commands::execute_parse(args)?;
        }
        Commands::Validate(args) => {
            info!("Executing validate command");
            commands::execute_validate(args)?;
        }
    }

    Ok(())
}
