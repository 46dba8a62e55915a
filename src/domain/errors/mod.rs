// Domain errors - Error types for the montage pipeline

use thiserror::Error;

/// Error taxonomy for montage assembly.
///
/// Fatal variants abort the whole run; everything else is per-item and is
/// logged and skipped by the stage that encounters it.
#[derive(Error, Debug)]
pub enum MontageError {
    /// Clip filename does not match the montage naming grammar
    #[error("Malformed clip name '{name}': {reason}")]
    MalformedClipName { name: String, reason: String },

    /// Clips folder is missing, unreadable, empty, or contains nothing
    /// parseable (fatal)
    #[error("No clips found in folder: {folder}")]
    NoClipsFound { folder: String },

    /// Every parsed clip failed validation (fatal)
    #[error("No valid clips remain after validation")]
    NoValidClips,

    /// Song could not be imported or measured (fatal)
    #[error("Could not import song '{path}': {message}")]
    SongImport { path: String, message: String },

    /// Audio feature analysis failed for one source
    #[error("Audio analysis failed for '{path}': {message}")]
    Detection { path: String, message: String },

    /// Host editor refused a media import or event placement
    #[error("Host placement failed for '{path}': {message}")]
    HostPlacement { path: String, message: String },

    /// A single effect cue could not be applied
    #[error("Effect cue failed: {message}")]
    EffectCue { message: String },

    /// Media quality probe failed
    #[error("Probe failed for '{path}': {message}")]
    Probe { path: String, message: String },

    /// Configuration file could not be loaded or parsed (fatal)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Run aborted through the cancellation flag (fatal)
    #[error("Montage run cancelled")]
    Cancelled,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MontageError {
    /// Whether this error aborts the whole run rather than a single item
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MontageError::NoClipsFound { .. }
                | MontageError::NoValidClips
                | MontageError::SongImport { .. }
                | MontageError::Config(_)
                | MontageError::Cancelled
        )
    }
}

/// Result type alias for montage operations
pub type MontageResult<T> = std::result::Result<T, MontageError>;
