// Static probe adapter - in-memory media facts table

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::errors::MontageResult;
use crate::domain::model::{MediaDescription, ProbeReport, TimeOffset};
use crate::ports::QualityProbePort;

/// One preloaded entry in the static table
#[derive(Debug, Clone)]
pub struct StaticMediaEntry {
    pub frame_rate: f64,
    pub codec_valid: bool,
    pub description: MediaDescription,
}

impl StaticMediaEntry {
    /// A healthy 60fps clip with both streams
    pub fn clip(duration_secs: f64) -> Self {
        Self {
            frame_rate: 60.0,
            codec_valid: true,
            description: MediaDescription {
                duration: TimeOffset::from_secs_f64(duration_secs),
                has_video: true,
                has_audio: true,
            },
        }
    }

    /// An audio-only song entry
    pub fn song(duration_secs: f64) -> Self {
        Self {
            frame_rate: 0.0,
            codec_valid: true,
            description: MediaDescription {
                duration: TimeOffset::from_secs_f64(duration_secs),
                has_video: false,
                has_audio: true,
            },
        }
    }
}

/// Probe backed by a fixed path table instead of a real media toolchain.
///
/// Serves tests and demo runs where no ffprobe binary is available; the
/// lookup table plays the role the host's media pool plays in production.
#[derive(Default)]
pub struct StaticProbeAdapter {
    entries: Mutex<HashMap<PathBuf, StaticMediaEntry>>,
}

impl StaticProbeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, entry: StaticMediaEntry) {
        self.entries.lock().unwrap().insert(path.into(), entry);
    }
}

impl QualityProbePort for StaticProbeAdapter {
    fn probe(&self, path: &Path) -> MontageResult<ProbeReport> {
        let entries = self.entries.lock().unwrap();
        Ok(match entries.get(path) {
            Some(entry) => ProbeReport {
                exists: true,
                frame_rate: entry.frame_rate,
                codec_valid: entry.codec_valid,
            },
            None => ProbeReport {
                exists: false,
                frame_rate: 0.0,
                codec_valid: false,
            },
        })
    }

    fn describe(&self, path: &Path) -> MontageResult<Option<MediaDescription>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(path)
            .map(|entry| entry.description.clone()))
    }
}
