// Configuration - value object passed into the pipeline, loaded from TOML

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::probe_ffprobe::DEFAULT_PROBE_TIMEOUT_MS;
use crate::detect::beats::{DEFAULT_BEAT_THRESHOLD, DEFAULT_FALLBACK_BPM};
use crate::detect::kills::{DEFAULT_KILL_MIN_INTERVAL_MS, DEFAULT_KILL_THRESHOLD};
use crate::detect::EventPolicy;
use crate::domain::errors::{MontageError, MontageResult};
use crate::domain::model::TimeOffset;
use crate::domain::validate::DEFAULT_MIN_FRAME_RATE;
use crate::schedule::EffectSettings;

/// Base config filename looked up next to the working directory
pub const CONFIG_FILE: &str = "montagecut.toml";
/// Optional override file merged on top of the base
pub const LOCAL_CONFIG_FILE: &str = "montagecut.local.toml";

/// Beat detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeatConfig {
    pub threshold: f64,
    pub fallback_bpm: f64,
    pub min_interval_ms: u64,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BEAT_THRESHOLD,
            fallback_bpm: DEFAULT_FALLBACK_BPM,
            min_interval_ms: 500,
        }
    }
}

/// Kill detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KillConfig {
    pub threshold: f64,
    pub min_interval_ms: u64,
}

impl Default for KillConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_KILL_THRESHOLD,
            min_interval_ms: DEFAULT_KILL_MIN_INTERVAL_MS,
        }
    }
}

/// Effect cue settings as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub slow_factor: f64,
    pub speed_factor: f64,
    pub remap_window_ms: u64,
    pub shake_intensity: f64,
    pub shake_beat_cap: usize,
    pub color_preset: String,
}

impl Default for EffectConfig {
    fn default() -> Self {
        let settings = EffectSettings::default();
        Self {
            slow_factor: settings.slow_factor,
            speed_factor: settings.speed_factor,
            remap_window_ms: settings.remap_window.as_millis(),
            shake_intensity: settings.shake_intensity,
            shake_beat_cap: settings.shake_beat_cap,
            color_preset: settings.color_preset,
        }
    }
}

/// Quick-mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickConfig {
    pub skip_validation: bool,
}

impl Default for QuickConfig {
    fn default() -> Self {
        Self {
            skip_validation: true,
        }
    }
}

/// Complete configuration value object.
///
/// Injected into the pipeline by value; nothing here is a process-wide
/// static.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MontageConfig {
    pub clips_folder: Option<PathBuf>,
    pub song_path: Option<PathBuf>,
    pub min_frame_rate: f64,
    pub clip_extensions: Vec<String>,
    pub probe_timeout_ms: u64,
    pub beat: BeatConfig,
    pub kill: KillConfig,
    pub effects: EffectConfig,
    pub quick: QuickConfig,
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            clips_folder: None,
            song_path: None,
            min_frame_rate: DEFAULT_MIN_FRAME_RATE,
            clip_extensions: vec!["mp4".to_string()],
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            beat: BeatConfig::default(),
            kill: KillConfig::default(),
            effects: EffectConfig::default(),
            quick: QuickConfig::default(),
        }
    }
}

impl MontageConfig {
    /// Load configuration with the base + local override pair: an explicit
    /// `--config` path wins outright; otherwise `montagecut.toml` is read if
    /// present and `montagecut.local.toml` values are merged on top.
    pub fn load(explicit: Option<&Path>) -> MontageResult<Self> {
        if let Some(path) = explicit {
            let text = std::fs::read_to_string(path).map_err(|e| {
                MontageError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            return parse_config(&text, path);
        }

        let base_path = Path::new(CONFIG_FILE);
        let mut value = if base_path.exists() {
            info!(path = CONFIG_FILE, "loading configuration");
            parse_value(&std::fs::read_to_string(base_path)?, base_path)?
        } else {
            toml::Value::Table(Default::default())
        };

        let local_path = Path::new(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            info!(path = LOCAL_CONFIG_FILE, "merging local configuration overrides");
            let local = parse_value(&std::fs::read_to_string(local_path)?, local_path)?;
            merge_values(&mut value, local);
        }

        value
            .try_into()
            .map_err(|e| MontageError::Config(format!("invalid configuration: {}", e)))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn beat_policy(&self) -> EventPolicy {
        EventPolicy::new(
            self.beat.threshold,
            TimeOffset::from_millis(self.beat.min_interval_ms),
        )
    }

    pub fn kill_policy(&self) -> EventPolicy {
        EventPolicy::new(
            self.kill.threshold,
            TimeOffset::from_millis(self.kill.min_interval_ms),
        )
    }

    pub fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            slow_factor: self.effects.slow_factor,
            speed_factor: self.effects.speed_factor,
            remap_window: TimeOffset::from_millis(self.effects.remap_window_ms),
            shake_intensity: self.effects.shake_intensity,
            shake_beat_cap: self.effects.shake_beat_cap,
            color_preset: self.effects.color_preset.clone(),
        }
    }
}

fn parse_config(text: &str, path: &Path) -> MontageResult<MontageConfig> {
    toml::from_str(text)
        .map_err(|e| MontageError::Config(format!("cannot parse {}: {}", path.display(), e)))
}

fn parse_value(text: &str, path: &Path) -> MontageResult<toml::Value> {
    toml::from_str(text)
        .map_err(|e| MontageError::Config(format!("cannot parse {}: {}", path.display(), e)))
}

/// Recursive table merge: override values win, nested tables merge key-wise
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => {
                        base_table.insert(key, overlay_value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}
