//! CLI module for MontageCut
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// MontageCut CLI
///
/// Assembles a beat-synchronized highlight montage plan from a folder of
/// short gameplay clips and a music track.
#[derive(Parser)]
#[command(name = "montagecut")]
#[command(about = "MontageCut - gameplay montage planning made simple")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the montage pipeline and print the placement plan
    Build(args::BuildArgs),
    /// Parse clip filenames in a folder and print their identities
    Parse(args::ParseArgs),
    /// Probe and validate clips in a folder, printing rejection reasons
    Validate(args::ValidateArgs),
}
