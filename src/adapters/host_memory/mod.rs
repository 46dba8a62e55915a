// In-memory host editor adapter - project model standing in for a real NLE

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use crate::domain::errors::{MontageError, MontageResult};
use crate::domain::model::{
    EffectCue, EventHandle, MediaFacts, MediaHandle, Placement, TrackHandle, TrackKind,
};
use crate::ports::{HostEditorPort, QualityProbePort};

/// One placed event in the project model
#[derive(Debug, Clone, Serialize)]
pub struct HostEvent {
    pub handle: EventHandle,
    pub media: MediaHandle,
    pub placement: Placement,
    pub cues: Vec<EffectCue>,
}

/// One track in the project model
#[derive(Debug, Clone, Serialize)]
pub struct HostTrack {
    pub handle: TrackHandle,
    pub kind: TrackKind,
    pub name: String,
    pub events: Vec<HostEvent>,
}

/// One imported media pool entry
#[derive(Debug, Clone, Serialize)]
pub struct ImportedMedia {
    pub handle: MediaHandle,
    pub path: PathBuf,
}

/// Serializable view of the whole project after a run
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    pub media: Vec<ImportedMedia>,
    pub tracks: Vec<HostTrack>,
}

#[derive(Default)]
struct ProjectState {
    next_id: u64,
    media: Vec<ImportedMedia>,
    tracks: Vec<HostTrack>,
}

impl ProjectState {
    fn next_handle(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Host editor adapter backed by an in-memory project model.
///
/// Media measurement delegates to the injected probe; the rest of the
/// media/track/event surface is faithful to the narrow host contract, so
/// pipeline behavior observed here transfers to a real editor adapter.
pub struct MemoryHostAdapter {
    probe: Arc<dyn QualityProbePort>,
    state: Mutex<ProjectState>,
}

impl MemoryHostAdapter {
    pub fn new(probe: Arc<dyn QualityProbePort>) -> Self {
        Self {
            probe,
            state: Mutex::new(ProjectState::default()),
        }
    }

    /// Copy of the current project graph, for dumps and assertions
    pub fn snapshot(&self) -> ProjectSnapshot {
        let state = self.state.lock().unwrap();
        ProjectSnapshot {
            media: state.media.clone(),
            tracks: state.tracks.clone(),
        }
    }
}

impl HostEditorPort for MemoryHostAdapter {
    fn clear_tracks(&self) -> MontageResult<()> {
        self.state.lock().unwrap().tracks.clear();
        Ok(())
    }

    fn import_media(&self, path: &Path) -> MontageResult<Option<MediaFacts>> {
        let description = match self.probe.describe(path)? {
            Some(description) => description,
            None => return Ok(None),
        };

        let mut state = self.state.lock().unwrap();
        let handle = MediaHandle(state.next_handle());
        state.media.push(ImportedMedia {
            handle,
            path: path.to_path_buf(),
        });
        debug!(path = %path.display(), handle = handle.0, "imported media");

        Ok(Some(MediaFacts {
            handle,
            duration: description.duration,
            has_video: description.has_video,
            has_audio: description.has_audio,
        }))
    }

    fn create_track(&self, kind: TrackKind, name: &str) -> MontageResult<TrackHandle> {
        let mut state = self.state.lock().unwrap();
        let handle = TrackHandle(state.next_handle());
        state.tracks.push(HostTrack {
            handle,
            kind,
            name: name.to_string(),
            events: Vec::new(),
        });
        Ok(handle)
    }

    fn add_event(
        &self,
        track: TrackHandle,
        media: MediaHandle,
        placement: &Placement,
    ) -> MontageResult<EventHandle> {
        if placement.duration.is_zero() {
            return Err(MontageError::HostPlacement {
                path: format!("media #{}", media.0),
                message: "zero-duration event".to_string(),
            });
        }

        let mut state = self.state.lock().unwrap();
        let handle = EventHandle(state.next_handle());
        let track_slot = state
            .tracks
            .iter_mut()
            .find(|t| t.handle == track)
            .ok_or_else(|| MontageError::HostPlacement {
                path: format!("media #{}", media.0),
                message: format!("unknown track #{}", track.0),
            })?;
        if track_slot.kind != placement.track {
            return Err(MontageError::HostPlacement {
                path: format!("media #{}", media.0),
                message: format!(
                    "{} placement on {} track '{}'",
                    placement.track, track_slot.kind, track_slot.name
                ),
            });
        }

        track_slot.events.push(HostEvent {
            handle,
            media,
            placement: *placement,
            cues: Vec::new(),
        });
        Ok(handle)
    }

    fn apply_cue(&self, event: EventHandle, cue: &EffectCue) -> MontageResult<()> {
        let mut state = self.state.lock().unwrap();
        let slot = state
            .tracks
            .iter_mut()
            .flat_map(|t| t.events.iter_mut())
            .find(|e| e.handle == event)
            .ok_or_else(|| MontageError::EffectCue {
                message: format!("unknown event #{}", event.0),
            })?;
        slot.cues.push(cue.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::probe_static::{StaticMediaEntry, StaticProbeAdapter};
    use crate::domain::model::TimeOffset;

    fn host_with_clip() -> MemoryHostAdapter {
        let probe = Arc::new(StaticProbeAdapter::new());
        probe.insert("clips/a.mp4", StaticMediaEntry::clip(5.0));
        MemoryHostAdapter::new(probe)
    }

    #[test]
    fn test_import_known_media_assigns_handles() {
        let host = host_with_clip();
        let facts = host.import_media(Path::new("clips/a.mp4")).unwrap().unwrap();
        assert_eq!(facts.duration, TimeOffset::from_secs_f64(5.0));
        assert!(facts.has_video);

        let snapshot = host.snapshot();
        assert_eq!(snapshot.media.len(), 1);
        assert_eq!(snapshot.media[0].handle, facts.handle);
    }

    #[test]
    fn test_import_unknown_media_returns_none() {
        let host = host_with_clip();
        assert!(host.import_media(Path::new("clips/nope.mp4")).unwrap().is_none());
    }

    #[test]
    fn test_add_event_rejects_kind_mismatch() {
        let host = host_with_clip();
        let facts = host.import_media(Path::new("clips/a.mp4")).unwrap().unwrap();
        let audio_track = host.create_track(TrackKind::Audio, "Clip Audio").unwrap();

        let video_placement = Placement::new(
            TrackKind::Video,
            TimeOffset::ZERO,
            TimeOffset::from_secs_f64(5.0),
        );
        let err = host
            .add_event(audio_track, facts.handle, &video_placement)
            .unwrap_err();
        assert!(matches!(err, MontageError::HostPlacement { .. }));
    }

    #[test]
    fn test_cues_attach_to_their_event() {
        let host = host_with_clip();
        let facts = host.import_media(Path::new("clips/a.mp4")).unwrap().unwrap();
        let track = host.create_track(TrackKind::Video, "Clips").unwrap();
        let placement = Placement::new(
            TrackKind::Video,
            TimeOffset::ZERO,
            TimeOffset::from_secs_f64(5.0),
        );
        let event = host.add_event(track, facts.handle, &placement).unwrap();

        host.apply_cue(
            event,
            &EffectCue::NameTag {
                text: "Alice - Snipe".to_string(),
            },
        )
        .unwrap();

        let snapshot = host.snapshot();
        assert_eq!(snapshot.tracks[0].events[0].cues.len(), 1);
    }

    #[test]
    fn test_clear_tracks_empties_the_project() {
        let host = host_with_clip();
        host.create_track(TrackKind::Video, "Clips").unwrap();
        host.clear_tracks().unwrap();
        assert!(host.snapshot().tracks.is_empty());
    }
}
