// Beat detection over the montage song

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::detect::{select_events, EventPolicy};
use crate::domain::model::{DetectedEvent, TimeOffset};
use crate::ports::AudioAnalysisPort;

/// Default score threshold for beat candidates
pub const DEFAULT_BEAT_THRESHOLD: f64 = 0.8;
/// Default BPM for the constant-interval fallback grid
pub const DEFAULT_FALLBACK_BPM: f64 = 120.0;

/// Detects musical beats in the song.
///
/// Real onset analysis is pluggable through [`AudioAnalysisPort`]; when the
/// analysis fails or yields nothing, a constant inter-beat grid derived from
/// `fallback_bpm` stands in. Either way the output satisfies the ordering
/// and minimum-interval contract.
pub struct BeatDetector {
    analysis: Arc<dyn AudioAnalysisPort>,
    policy: EventPolicy,
    fallback_bpm: f64,
}

impl BeatDetector {
    pub fn new(
        analysis: Arc<dyn AudioAnalysisPort>,
        policy: EventPolicy,
        fallback_bpm: f64,
    ) -> Self {
        Self {
            analysis,
            policy,
            fallback_bpm,
        }
    }

    /// Detect beats in `[0, song_duration)`. Never fails: analysis errors
    /// degrade to the BPM grid.
    pub fn detect(&self, song_path: &Path, song_duration: TimeOffset) -> Vec<TimeOffset> {
        let candidates = match self.analysis.onset_candidates(song_path) {
            Ok(candidates) if !candidates.is_empty() => candidates,
            Ok(_) => {
                debug!(
                    song = %song_path.display(),
                    bpm = self.fallback_bpm,
                    "beat analysis returned no candidates, using BPM grid"
                );
                self.bpm_grid(song_duration)
            }
            Err(err) => {
                warn!(
                    song = %song_path.display(),
                    error = %err,
                    "beat analysis failed, falling back to BPM grid"
                );
                self.bpm_grid(song_duration)
            }
        };

        select_events(&candidates, &self.policy)
            .into_iter()
            .filter(|at| *at < song_duration)
            .collect()
    }

    /// Constant inter-beat grid over the song duration
    fn bpm_grid(&self, song_duration: TimeOffset) -> Vec<DetectedEvent> {
        if self.fallback_bpm <= 0.0 {
            return Vec::new();
        }
        let interval_ms = (60_000.0 / self.fallback_bpm).round() as u64;
        if interval_ms == 0 {
            return Vec::new();
        }

        let mut beats = Vec::new();
        let mut at = 0u64;
        while at < song_duration.as_millis() {
            beats.push(DetectedEvent::new(TimeOffset::from_millis(at), 1.0));
            at += interval_ms;
        }
        beats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{MontageError, MontageResult};

    struct FixedAnalysis(Vec<DetectedEvent>);

    impl AudioAnalysisPort for FixedAnalysis {
        fn onset_candidates(&self, _path: &Path) -> MontageResult<Vec<DetectedEvent>> {
            Ok(self.0.clone())
        }
    }

    struct FailingAnalysis;

    impl AudioAnalysisPort for FailingAnalysis {
        fn onset_candidates(&self, path: &Path) -> MontageResult<Vec<DetectedEvent>> {
            Err(MontageError::Detection {
                path: path.display().to_string(),
                message: "unreadable signal".to_string(),
            })
        }
    }

    fn policy() -> EventPolicy {
        EventPolicy::new(DEFAULT_BEAT_THRESHOLD, TimeOffset::from_secs_f64(0.5))
    }

    #[test]
    fn test_bpm_grid_fallback_at_120_bpm() {
        let detector = BeatDetector::new(Arc::new(FixedAnalysis(Vec::new())), policy(), 120.0);
        let beats = detector.detect(Path::new("song.mp3"), TimeOffset::from_secs_f64(30.0));

        // 120 BPM = one beat every 0.5s over [0, 30)
        assert_eq!(beats.len(), 60);
        assert_eq!(beats[0], TimeOffset::ZERO);
        assert_eq!(beats[1], TimeOffset::from_secs_f64(0.5));
        assert_eq!(beats[59], TimeOffset::from_secs_f64(29.5));
    }

    #[test]
    fn test_analysis_failure_degrades_to_grid() {
        let detector = BeatDetector::new(Arc::new(FailingAnalysis), policy(), 60.0);
        let beats = detector.detect(Path::new("song.mp3"), TimeOffset::from_secs_f64(4.0));
        assert_eq!(
            beats,
            vec![
                TimeOffset::ZERO,
                TimeOffset::from_secs_f64(1.0),
                TimeOffset::from_secs_f64(2.0),
                TimeOffset::from_secs_f64(3.0),
            ]
        );
    }

    #[test]
    fn test_real_candidates_are_thresholded_and_spaced() {
        let candidates = vec![
            DetectedEvent::new(TimeOffset::from_secs_f64(0.2), 0.9),
            DetectedEvent::new(TimeOffset::from_secs_f64(0.4), 0.95),
            DetectedEvent::new(TimeOffset::from_secs_f64(1.0), 0.85),
            DetectedEvent::new(TimeOffset::from_secs_f64(2.0), 0.3),
        ];
        let detector = BeatDetector::new(Arc::new(FixedAnalysis(candidates)), policy(), 120.0);
        let beats = detector.detect(Path::new("song.mp3"), TimeOffset::from_secs_f64(30.0));
        assert_eq!(
            beats,
            vec![TimeOffset::from_secs_f64(0.2), TimeOffset::from_secs_f64(1.0)]
        );
    }

    #[test]
    fn test_beats_past_song_end_are_discarded() {
        let candidates = vec![
            DetectedEvent::new(TimeOffset::from_secs_f64(1.0), 0.9),
            DetectedEvent::new(TimeOffset::from_secs_f64(31.0), 0.9),
        ];
        let detector = BeatDetector::new(Arc::new(FixedAnalysis(candidates)), policy(), 120.0);
        let beats = detector.detect(Path::new("song.mp3"), TimeOffset::from_secs_f64(30.0));
        assert_eq!(beats, vec![TimeOffset::from_secs_f64(1.0)]);
    }
}
