//! MontageCut Library
//!
//! Turns a folder of named gameplay clips and a music track into a
//! beat-synchronized montage plan: parse clip identities from filenames,
//! validate media quality, detect beats and kills, lay clips onto a
//! timeline, and cue effects on each placement.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod detect;
pub mod domain;
pub mod pipeline;
pub mod ports;
pub mod schedule;

// Re-export commonly used types
pub use config::MontageConfig;
pub use domain::errors::{MontageError, MontageResult};
pub use domain::model::{ClipIdentity, ClipRecord, ClipRole, Placement, TimeOffset};
pub use pipeline::{CancelFlag, MontageOutcome, MontagePipeline, RunMode};
