//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Folder of clip files (overrides the configured clips_folder)
    #[arg(short, long)]
    pub clips: Option<PathBuf>,

    /// Music track for the montage (overrides the configured song_path)
    #[arg(short, long)]
    pub song: Option<PathBuf>,

    /// Explicit configuration file (skips the base/local lookup)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Quick mode: skip beat/kill detection, optionally skip validation
    #[arg(long)]
    pub quick: bool,

    /// Emit the full plan and project snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the parse command
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Folder of clip files
    #[arg(short, long)]
    pub clips: PathBuf,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Folder of clip files
    #[arg(short, long)]
    pub clips: PathBuf,

    /// Explicit configuration file (skips the base/local lookup)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
