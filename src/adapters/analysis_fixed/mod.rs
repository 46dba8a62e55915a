// Fixed onset adapter - deterministic stand-in for signal analysis

use std::path::Path;

use crate::domain::errors::MontageResult;
use crate::domain::model::{DetectedEvent, TimeOffset};
use crate::ports::AudioAnalysisPort;

/// Returns the same candidate list for every source.
///
/// This is the reference placeholder detector: a real waveform/onset
/// analyzer plugs in behind the same port. The default candidate set mirrors
/// the hand-picked kill timestamps real gameplay clips tend to produce in
/// the 5-15 second range.
pub struct FixedOnsetAdapter {
    candidates: Vec<DetectedEvent>,
}

impl FixedOnsetAdapter {
    pub fn new(candidates: Vec<DetectedEvent>) -> Self {
        Self { candidates }
    }

    /// No candidates for any source; beat detection then falls back to its
    /// BPM grid
    pub fn silent() -> Self {
        Self::new(Vec::new())
    }
}

impl Default for FixedOnsetAdapter {
    fn default() -> Self {
        Self::new(vec![
            DetectedEvent::new(TimeOffset::from_secs_f64(2.0), 0.9),
            DetectedEvent::new(TimeOffset::from_secs_f64(5.5), 0.8),
            DetectedEvent::new(TimeOffset::from_secs_f64(8.2), 0.75),
        ])
    }
}

impl AudioAnalysisPort for FixedOnsetAdapter {
    fn onset_candidates(&self, _path: &Path) -> MontageResult<Vec<DetectedEvent>> {
        Ok(self.candidates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_candidates_are_scored_and_unordered_safe() {
        let adapter = FixedOnsetAdapter::default();
        let candidates = adapter.onset_candidates(Path::new("clip.mp4")).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].at, TimeOffset::from_secs_f64(2.0));
    }

    #[test]
    fn test_silent_adapter_returns_nothing() {
        let adapter = FixedOnsetAdapter::silent();
        assert!(adapter.onset_candidates(Path::new("song.mp3")).unwrap().is_empty());
    }
}
