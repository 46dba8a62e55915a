// Ports - Interface definitions (contracts)
//
// The pipeline runs single-threaded and cooperatively with the host editor,
// so all ports are synchronous; adapters that wrap external processes block
// the invoking thread.

use std::path::Path;

use crate::domain::errors::MontageResult;
use crate::domain::model::{
    DetectedEvent, EffectCue, EventHandle, MediaDescription, MediaFacts, MediaHandle, Placement,
    ProbeReport, TrackHandle, TrackKind,
};

/// Port for the host timeline editor's media/track/event surface.
///
/// The core never owns host objects; it refers to them through the opaque
/// handles returned here.
pub trait HostEditorPort: Send + Sync {
    /// Remove all tracks from the current project
    fn clear_tracks(&self) -> MontageResult<()>;

    /// Import a media file into the project pool; `None` means the host
    /// could not open the file (per-clip recoverable)
    fn import_media(&self, path: &Path) -> MontageResult<Option<MediaFacts>>;

    /// Create a new track of the given kind
    fn create_track(&self, kind: TrackKind, name: &str) -> MontageResult<TrackHandle>;

    /// Place a media event on a track at the given interval
    fn add_event(
        &self,
        track: TrackHandle,
        media: MediaHandle,
        placement: &Placement,
    ) -> MontageResult<EventHandle>;

    /// Attach one effect cue to a placed event
    fn apply_cue(&self, event: EventHandle, cue: &EffectCue) -> MontageResult<()>;
}

/// Port for the quality-facts collaborator
pub trait QualityProbePort: Send + Sync {
    /// Probe existence, frame rate, and codec validity for one file
    fn probe(&self, path: &Path) -> MontageResult<ProbeReport>;

    /// Measure duration and stream presence; `None` when the file cannot be
    /// opened as media
    fn describe(&self, path: &Path) -> MontageResult<Option<MediaDescription>>;
}

/// Port for pluggable audio feature analysis.
///
/// Implementations return raw onset candidates with confidence scores; the
/// detectors own thresholding, ordering, and minimum-interval selection.
pub trait AudioAnalysisPort: Send + Sync {
    fn onset_candidates(&self, path: &Path) -> MontageResult<Vec<DetectedEvent>>;
}
