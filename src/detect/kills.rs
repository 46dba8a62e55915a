// Kill detection inside individual clips

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::detect::{select_events, EventPolicy};
use crate::domain::model::TimeOffset;
use crate::ports::AudioAnalysisPort;

/// Default score threshold for kill candidates
pub const DEFAULT_KILL_THRESHOLD: f64 = 0.7;
/// Default minimum spacing between kept kills
pub const DEFAULT_KILL_MIN_INTERVAL_MS: u64 = 500;

/// Detects in-game kill moments in a clip's audio.
///
/// Detection failure is never fatal: an unreadable clip yields an empty
/// sequence and a warning, and the clip still participates in the montage.
pub struct KillDetector {
    analysis: Arc<dyn AudioAnalysisPort>,
    policy: EventPolicy,
}

impl KillDetector {
    pub fn new(analysis: Arc<dyn AudioAnalysisPort>, policy: EventPolicy) -> Self {
        Self { analysis, policy }
    }

    /// Detect kills in `[0, clip_duration)`, clip-relative
    pub fn detect(&self, clip_path: &Path, clip_duration: TimeOffset) -> Vec<TimeOffset> {
        let candidates = match self.analysis.onset_candidates(clip_path) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(
                    clip = %clip_path.display(),
                    error = %err,
                    "kill analysis failed, continuing with no kills"
                );
                return Vec::new();
            }
        };

        select_events(&candidates, &self.policy)
            .into_iter()
            .filter(|at| *at < clip_duration)
            .collect()
    }
}
