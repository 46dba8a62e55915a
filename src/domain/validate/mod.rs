// Clip validation - quality acceptance rules

use crate::domain::model::{ClipRecord, ProbeReport};

/// Default minimum acceptable frame rate for montage footage
pub const DEFAULT_MIN_FRAME_RATE: f64 = 60.0;

/// Applies acceptance rules to a parsed clip plus externally probed quality
/// facts. Each rule is independently sufficient to reject; a failing clip is
/// excluded from the run, never a reason to abort the batch.
#[derive(Debug, Clone)]
pub struct ClipValidator {
    min_frame_rate: f64,
}

impl ClipValidator {
    pub fn new(min_frame_rate: f64) -> Self {
        Self { min_frame_rate }
    }

    /// Ordered rejection reasons for one clip; empty means the clip is valid
    pub fn rejection_reasons(&self, record: &ClipRecord, report: &ProbeReport) -> Vec<String> {
        let mut reasons = Vec::new();

        if record.path.as_os_str().is_empty() {
            reasons.push("file path is empty".to_string());
        }

        if !report.exists {
            reasons.push("file does not exist".to_string());
        }

        if report.frame_rate < self.min_frame_rate {
            reasons.push(format!(
                "frame rate {:.2} is below the minimum {:.2}",
                report.frame_rate, self.min_frame_rate
            ));
        }

        if !report.codec_valid {
            reasons.push("codec facts reported invalid".to_string());
        }

        reasons
    }
}

impl Default for ClipValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FRAME_RATE)
    }
}
