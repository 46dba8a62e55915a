// Domain models - Core types and data structures

use std::fmt;
use std::ops::Add;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Non-negative offset from the timeline/song zero point, millisecond precision.
///
/// Stored as integer milliseconds so offsets are totally ordered and hashable,
/// which the detection de-duplication and placement sorting rely on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeOffset {
    millis: u64,
}

impl TimeOffset {
    pub const ZERO: TimeOffset = TimeOffset { millis: 0 };

    /// Create a TimeOffset from whole milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Create a TimeOffset from fractional seconds; negative input clamps to zero
    pub fn from_secs_f64(seconds: f64) -> Self {
        if seconds <= 0.0 || !seconds.is_finite() {
            return Self::ZERO;
        }
        Self {
            millis: (seconds * 1000.0).round() as u64,
        }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Signed difference in milliseconds (`self - other`)
    pub fn delta_millis(&self, other: TimeOffset) -> i64 {
        self.millis as i64 - other.millis as i64
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(&self, other: TimeOffset) -> TimeOffset {
        TimeOffset {
            millis: self.millis.saturating_sub(other.millis),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }
}

impl Add for TimeOffset {
    type Output = TimeOffset;

    fn add(self, rhs: TimeOffset) -> TimeOffset {
        TimeOffset {
            millis: self.millis.saturating_add(rhs.millis),
        }
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_seconds = self.millis / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let milliseconds = self.millis % 1000;

        if hours > 0 {
            write!(
                f,
                "{}:{:02}:{:02}.{:03}",
                hours, minutes, seconds, milliseconds
            )
        } else {
            write!(f, "{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

/// Montage role parsed from the clip filename marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipRole {
    Opener,
    Normal,
    Closer,
}

impl ClipRole {
    /// Sort rank: openers first, closers last
    pub fn rank(&self) -> u8 {
        match self {
            ClipRole::Opener => 0,
            ClipRole::Normal => 1,
            ClipRole::Closer => 2,
        }
    }
}

impl fmt::Display for ClipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipRole::Opener => write!(f, "opener"),
            ClipRole::Normal => write!(f, "normal"),
            ClipRole::Closer => write!(f, "closer"),
        }
    }
}

/// Immutable metadata parsed from a clip filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipIdentity {
    pub player_name: String,
    pub game: String,
    pub map: String,
    pub gun: String,
    pub clip_type: String,
    pub sequence_number: u32,
    pub role: ClipRole,
}

impl ClipIdentity {
    /// Text used for the on-screen name tag cue
    pub fn name_tag(&self) -> String {
        format!("{} - {}", self.player_name, self.clip_type)
    }
}

/// Opaque handle to a media item inside the host editor's pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaHandle(pub u64);

/// Opaque handle to a host editor track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackHandle(pub u64);

/// Opaque handle to a placed host editor event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventHandle(pub u64);

/// Facts the host editor reports after importing a media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFacts {
    pub handle: MediaHandle,
    pub duration: TimeOffset,
    pub has_video: bool,
    pub has_audio: bool,
}

/// What the clip folder's media actually contains, independent of the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescription {
    pub duration: TimeOffset,
    pub has_video: bool,
    pub has_audio: bool,
}

/// Quality facts supplied by the probe collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub exists: bool,
    pub frame_rate: f64,
    pub codec_valid: bool,
}

/// One clip flowing through a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipRecord {
    pub identity: ClipIdentity,
    pub path: PathBuf,
    /// Human-readable rejection reasons; empty means valid
    pub rejections: Vec<String>,
    /// Detected kill moments, clip-relative, ascending
    pub kills: Vec<TimeOffset>,
    /// Set once the host editor has imported the file
    pub media: Option<MediaFacts>,
    /// Set by the timeline scheduler; final after beat sync
    pub placement: Option<Placement>,
}

impl ClipRecord {
    pub fn new(identity: ClipIdentity, path: PathBuf) -> Self {
        Self {
            identity,
            path,
            rejections: Vec::new(),
            kills: Vec::new(),
            media: None,
            placement: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Timestamped detection candidate with its confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedEvent {
    pub at: TimeOffset,
    pub score: f64,
}

impl DetectedEvent {
    pub fn new(at: TimeOffset, score: f64) -> Self {
        Self { at, score }
    }
}

/// Kind of timeline track a placement targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// A clip's assigned interval on a track; half-open `[start, start + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub track: TrackKind,
    pub start: TimeOffset,
    pub duration: TimeOffset,
}

impl Placement {
    pub fn new(track: TrackKind, start: TimeOffset, duration: TimeOffset) -> Self {
        Self {
            track,
            start,
            duration,
        }
    }

    pub fn end(&self) -> TimeOffset {
        self.start + self.duration
    }

    /// Whether `at` falls inside the half-open interval
    pub fn contains(&self, at: TimeOffset) -> bool {
        at >= self.start && at < self.end()
    }
}

/// One scheduled effect instruction attached to a placement.
///
/// Name tags and color presets are idempotent; time-remap windows and shake
/// keyframes are not, so the effect scheduler emits each at most once per
/// detected event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectCue {
    TimeRemapWindow {
        start: TimeOffset,
        end: TimeOffset,
        slow_factor: f64,
        speed_factor: f64,
    },
    ShakeKeyframe {
        at: TimeOffset,
        intensity: f64,
    },
    NameTag {
        text: String,
    },
    ColorPreset {
        name: String,
    },
}

#[cfg(test)]
mod tests;
