// FFprobe adapter - media quality and stream facts via ffprobe(1)

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::domain::errors::{MontageError, MontageResult};
use crate::domain::model::{MediaDescription, ProbeReport, TimeOffset};
use crate::ports::QualityProbePort;

/// Default deadline for one probe call
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

/// Probe adapter that shells out to ffprobe with JSON output.
///
/// The call is synchronous and blocks the pipeline thread, matching the
/// single-threaded resource model. Each call runs under a deadline: a hung
/// ffprobe is killed and reported as a per-item probe failure, so one bad
/// file cannot stall the whole run.
pub struct FfprobeAdapter {
    binary: PathBuf,
    timeout: Duration,
}

impl FfprobeAdapter {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("ffprobe"),
            timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }

    /// Use a specific ffprobe binary instead of relying on PATH
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::new()
        }
    }

    /// Deadline for one probe call; on expiry the child is killed and the
    /// probe fails for that item only
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, path: &Path) -> MontageResult<FfprobeOutput> {
        let probe_err = |message: String| MontageError::Probe {
            path: path.display().to_string(),
            message,
        };

        let mut child = Command::new(&self.binary)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| probe_err(format!("could not run {}: {}", self.binary.display(), e)))?;

        let status = self.wait_with_deadline(&mut child, path)?;
        if !status.success() {
            return Err(probe_err(format!("ffprobe exited with {}", status)));
        }

        let mut raw = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout
                .read_to_end(&mut raw)
                .map_err(|e| probe_err(format!("could not read ffprobe output: {}", e)))?;
        }
        serde_json::from_slice(&raw)
            .map_err(|e| probe_err(format!("unparseable ffprobe output: {}", e)))
    }

    /// Poll the child until it exits or the deadline passes; expiry kills it
    fn wait_with_deadline(&self, child: &mut Child, path: &Path) -> MontageResult<ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(MontageError::Probe {
                        path: path.display().to_string(),
                        message: format!(
                            "ffprobe timed out after {}ms",
                            self.timeout.as_millis()
                        ),
                    });
                }
                Ok(None) => std::thread::sleep(Duration::from_millis(10)),
                Err(e) => {
                    return Err(MontageError::Probe {
                        path: path.display().to_string(),
                        message: format!("could not wait for ffprobe: {}", e),
                    })
                }
            }
        }
    }
}

impl Default for FfprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityProbePort for FfprobeAdapter {
    fn probe(&self, path: &Path) -> MontageResult<ProbeReport> {
        if !path.exists() {
            return Ok(ProbeReport {
                exists: false,
                frame_rate: 0.0,
                codec_valid: false,
            });
        }

        let output = self.run(path)?;
        let report = ProbeReport {
            exists: true,
            frame_rate: output.video_frame_rate().unwrap_or(0.0),
            codec_valid: output.codecs_recognized(),
        };
        debug!(
            path = %path.display(),
            frame_rate = report.frame_rate,
            codec_valid = report.codec_valid,
            "probed media"
        );
        Ok(report)
    }

    fn describe(&self, path: &Path) -> MontageResult<Option<MediaDescription>> {
        if !path.exists() {
            return Ok(None);
        }
        let output = match self.run(path) {
            Ok(output) => output,
            // Not media at all; the host treats this as an unopenable file
            Err(MontageError::Probe { .. }) => return Ok(None),
            Err(other) => return Err(other),
        };

        let duration = match output.duration_seconds() {
            Some(seconds) => TimeOffset::from_secs_f64(seconds),
            None => return Ok(None),
        };
        Ok(Some(MediaDescription {
            duration,
            has_video: output.has_stream("video"),
            has_audio: output.has_stream("audio"),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    avg_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

impl FfprobeOutput {
    fn has_stream(&self, kind: &str) -> bool {
        self.streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some(kind))
    }

    fn video_frame_rate(&self) -> Option<f64> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .and_then(|s| s.avg_frame_rate.as_deref())
            .and_then(parse_rational)
    }

    fn codecs_recognized(&self) -> bool {
        !self.streams.is_empty()
            && self
                .streams
                .iter()
                .all(|s| s.codec_name.as_deref().is_some_and(|name| !name.is_empty()))
    }

    fn duration_seconds(&self) -> Option<f64> {
        self.format
            .as_ref()
            .and_then(|f| f.duration.as_deref())
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| *d > 0.0)
    }
}

/// Parse ffprobe's rational frame rate notation ("60/1", "60000/1001")
fn parse_rational(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => raw.parse().ok(),
    }
}
