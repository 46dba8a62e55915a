// Effect scheduling - maps detected events to cues per placement

use serde::{Deserialize, Serialize};

use crate::domain::model::{ClipRecord, EffectCue, TimeOffset};
use crate::schedule::ScheduledClip;

/// Tunables for cue emission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSettings {
    /// Playback factor inside a time-remap window
    pub slow_factor: f64,
    /// Playback factor used to catch back up after the window
    pub speed_factor: f64,
    /// Length of the remap window opened at each kill
    pub remap_window: TimeOffset,
    pub shake_intensity: f64,
    /// Only the first N beats of the song are considered for shake cues,
    /// bounding the number of cues per run
    pub shake_beat_cap: usize,
    pub color_preset: String,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            slow_factor: 0.5,
            speed_factor: 1.5,
            remap_window: TimeOffset::from_millis(1000),
            shake_intensity: 10.0,
            shake_beat_cap: 10,
            color_preset: "Cinematic".to_string(),
        }
    }
}

/// Emits the ordered cue list for each placed clip.
///
/// Cues are independent of each other; a failure applying one cue never
/// invalidates the rest of the placement's cue set. Time-remap and shake
/// cues are emitted at most once per detected event.
pub struct EffectScheduler {
    settings: EffectSettings,
}

impl EffectScheduler {
    pub fn new(settings: EffectSettings) -> Self {
        Self { settings }
    }

    /// Cue list for one scheduled clip, in application order
    pub fn cues_for(
        &self,
        record: &ClipRecord,
        placed: &ScheduledClip,
        beats: &[TimeOffset],
    ) -> Vec<EffectCue> {
        let video = &placed.video;
        let mut cues = Vec::new();

        // One remap window per kill falling inside the placement interval.
        // Kill offsets are clip-relative and already deduplicated, but a
        // duplicate guard keeps the at-most-once guarantee local.
        let mut last_kill = None;
        for &kill in &record.kills {
            if last_kill == Some(kill) {
                continue;
            }
            last_kill = Some(kill);

            let at = video.start + kill;
            if !video.contains(at) {
                continue;
            }
            let end = (at + self.settings.remap_window).min(video.end());
            if end <= at {
                continue;
            }
            cues.push(EffectCue::TimeRemapWindow {
                start: at,
                end,
                slow_factor: self.settings.slow_factor,
                speed_factor: self.settings.speed_factor,
            });
        }

        // Shake on the bounded beat prefix; beats are unique and ascending,
        // so each lands at most one keyframe here.
        for &beat in beats.iter().take(self.settings.shake_beat_cap) {
            if video.contains(beat) {
                cues.push(EffectCue::ShakeKeyframe {
                    at: beat,
                    intensity: self.settings.shake_intensity,
                });
            }
        }

        cues.push(EffectCue::NameTag {
            text: record.identity.name_tag(),
        });
        cues.push(EffectCue::ColorPreset {
            name: self.settings.color_preset.clone(),
        });

        cues
    }
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new(EffectSettings::default())
    }
}
