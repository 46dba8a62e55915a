// Montage pipeline - staged orchestration from clip folder to effect cues

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::MontageConfig;
use crate::detect::{BeatDetector, KillDetector};
use crate::domain::errors::{MontageError, MontageResult};
use crate::domain::identify::{parse_clip_path, scan_clips_folder};
use crate::domain::model::{
    ClipRecord, EffectCue, EventHandle, MediaFacts, TimeOffset, TrackKind,
};
use crate::domain::validate::ClipValidator;
use crate::ports::{AudioAnalysisPort, HostEditorPort, QualityProbePort};
use crate::schedule::{EffectScheduler, TimelinePlan, TimelineScheduler};

/// Cooperative cancellation signal, checked at every per-clip boundary.
/// Aborting leaves already-committed placements intact.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pipeline stages in execution order; `Failed` is reachable from any stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Parsing,
    Validating,
    DetectingAudio,
    Scheduling,
    ApplyingEffects,
    Done,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Parsing => "parsing",
            PipelineStage::Validating => "validating",
            PipelineStage::DetectingAudio => "detecting-audio",
            PipelineStage::Scheduling => "scheduling",
            PipelineStage::ApplyingEffects => "applying-effects",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Entry modes: full runs everything; quick skips beat/kill detection and,
/// depending on configuration, validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Full,
    Quick,
}

/// Summary counters for one completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MontageReport {
    pub parsed: usize,
    pub valid: usize,
    pub placed: usize,
    pub beats: usize,
    pub cues_applied: usize,
}

/// Everything a run produced: the per-clip records, the placement plan, and
/// the cue list per scheduled clip (parallel to `plan.clips`)
#[derive(Debug, Clone, Serialize)]
pub struct MontageOutcome {
    pub records: Vec<ClipRecord>,
    pub plan: TimelinePlan,
    pub cues: Vec<Vec<EffectCue>>,
    pub report: MontageReport,
}

/// Orchestrates identification, validation, detection, scheduling, and
/// effect cueing against the injected collaborator ports.
///
/// Single-threaded by design: host editor mutations are only safe on the
/// invoking thread, and the caller must keep at most one run in flight.
pub struct MontagePipeline {
    host: Arc<dyn HostEditorPort>,
    probe: Arc<dyn QualityProbePort>,
    beat_analysis: Arc<dyn AudioAnalysisPort>,
    kill_analysis: Arc<dyn AudioAnalysisPort>,
    config: MontageConfig,
    cancel: CancelFlag,
}

impl MontagePipeline {
    pub fn new(
        host: Arc<dyn HostEditorPort>,
        probe: Arc<dyn QualityProbePort>,
        beat_analysis: Arc<dyn AudioAnalysisPort>,
        kill_analysis: Arc<dyn AudioAnalysisPort>,
        config: MontageConfig,
    ) -> Self {
        Self {
            host,
            probe,
            beat_analysis,
            kill_analysis,
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Install a cancellation flag shared with the caller
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the whole pipeline for one clips folder and song
    pub fn run(
        &self,
        clips_folder: &Path,
        song_path: &Path,
        mode: RunMode,
    ) -> MontageResult<MontageOutcome> {
        match self.run_stages(clips_folder, song_path, mode) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(stage = %PipelineStage::Failed, error = %err, "montage run failed");
                Err(err)
            }
        }
    }

    fn run_stages(
        &self,
        clips_folder: &Path,
        song_path: &Path,
        mode: RunMode,
    ) -> MontageResult<MontageOutcome> {
        // Parsing
        self.enter(PipelineStage::Parsing);
        let mut records = self.parse_folder(clips_folder)?;
        let parsed = records.len();

        // Validating
        self.enter(PipelineStage::Validating);
        self.validate_records(&mut records, mode)?;
        let valid = records.iter().filter(|r| r.is_valid()).count();

        // DetectingAudio
        self.enter(PipelineStage::DetectingAudio);
        let (song_facts, beats) = self.detect_audio(&mut records, song_path, mode)?;

        // Scheduling
        self.enter(PipelineStage::Scheduling);
        let (mut plan, committed) =
            self.schedule_timeline(&records, &beats, song_path, &song_facts)?;
        for (scheduled, event) in plan.clips.iter().zip(&committed) {
            if event.is_some() {
                records[scheduled.record_index].placement = Some(scheduled.video);
            }
        }
        let placed = committed.iter().filter(|e| e.is_some()).count();

        // ApplyingEffects
        self.enter(PipelineStage::ApplyingEffects);
        let (cues, cues_applied) = self.apply_effects(&records, &mut plan, &committed, &beats)?;

        self.enter(PipelineStage::Done);
        let report = MontageReport {
            parsed,
            valid,
            placed,
            beats: beats.len(),
            cues_applied,
        };
        info!(
            parsed = report.parsed,
            valid = report.valid,
            placed = report.placed,
            beats = report.beats,
            cues = report.cues_applied,
            "montage run complete"
        );

        Ok(MontageOutcome {
            records,
            plan,
            cues,
            report,
        })
    }

    fn enter(&self, stage: PipelineStage) {
        info!(stage = %stage, "pipeline stage");
    }

    fn checkpoint(&self) -> MontageResult<()> {
        if self.cancel.is_cancelled() {
            return Err(MontageError::Cancelled);
        }
        Ok(())
    }

    /// Scan and parse the clips folder; malformed names are logged and
    /// excluded, an unusable folder is fatal
    fn parse_folder(&self, clips_folder: &Path) -> MontageResult<Vec<ClipRecord>> {
        let files = scan_clips_folder(clips_folder, &self.config.clip_extensions)?;
        if files.is_empty() {
            return Err(MontageError::NoClipsFound {
                folder: clips_folder.display().to_string(),
            });
        }

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            self.checkpoint()?;
            match parse_clip_path(&file) {
                Ok(identity) => records.push(ClipRecord::new(identity, file)),
                Err(err) => warn!(error = %err, "skipping unparseable clip"),
            }
        }

        if records.is_empty() {
            return Err(MontageError::NoClipsFound {
                folder: format!("{} (no parseable clip names)", clips_folder.display()),
            });
        }
        Ok(records)
    }

    fn validate_records(&self, records: &mut [ClipRecord], mode: RunMode) -> MontageResult<()> {
        if mode == RunMode::Quick && self.config.quick.skip_validation {
            info!("quick mode: skipping validation");
            return Ok(());
        }

        let validator = ClipValidator::new(self.config.min_frame_rate);
        for record in records.iter_mut() {
            self.checkpoint()?;
            record.rejections = match self.probe.probe(&record.path) {
                Ok(report) => validator.rejection_reasons(record, &report),
                Err(err) => vec![format!("probe failed: {}", err)],
            };
            if !record.is_valid() {
                warn!(
                    clip = %record.path.display(),
                    reasons = ?record.rejections,
                    "clip rejected"
                );
            }
        }

        if !records.iter().any(|r| r.is_valid()) {
            return Err(MontageError::NoValidClips);
        }
        Ok(())
    }

    /// Import the song and clip media, then run beat and kill detection
    fn detect_audio(
        &self,
        records: &mut [ClipRecord],
        song_path: &Path,
        mode: RunMode,
    ) -> MontageResult<(MediaFacts, Vec<TimeOffset>)> {
        let song_facts = self
            .host
            .import_media(song_path)
            .map_err(|err| MontageError::SongImport {
                path: song_path.display().to_string(),
                message: err.to_string(),
            })?
            .ok_or_else(|| MontageError::SongImport {
                path: song_path.display().to_string(),
                message: "host editor could not open the song".to_string(),
            })?;
        if song_facts.duration.is_zero() {
            return Err(MontageError::SongImport {
                path: song_path.display().to_string(),
                message: "song has zero duration".to_string(),
            });
        }

        let beats = match mode {
            RunMode::Full => {
                let detector = BeatDetector::new(
                    Arc::clone(&self.beat_analysis),
                    self.config.beat_policy(),
                    self.config.beat.fallback_bpm,
                );
                detector.detect(song_path, song_facts.duration)
            }
            RunMode::Quick => {
                info!("quick mode: skipping beat detection");
                Vec::new()
            }
        };

        let kill_detector =
            KillDetector::new(Arc::clone(&self.kill_analysis), self.config.kill_policy());
        for record in records.iter_mut().filter(|r| r.is_valid()) {
            self.checkpoint()?;
            match self.host.import_media(&record.path) {
                Ok(Some(facts)) => {
                    if mode == RunMode::Full {
                        record.kills = kill_detector.detect(&record.path, facts.duration);
                    }
                    record.media = Some(facts);
                }
                Ok(None) => {
                    warn!(
                        clip = %record.path.display(),
                        "host editor could not open clip, it will not be placed"
                    );
                }
                Err(err) => {
                    warn!(
                        clip = %record.path.display(),
                        error = %err,
                        "clip import failed, it will not be placed"
                    );
                }
            }
        }

        Ok((song_facts, beats))
    }

    /// Build the placement plan, sync it to the beats, and commit it to the
    /// host editor track by track
    fn schedule_timeline(
        &self,
        records: &[ClipRecord],
        beats: &[TimeOffset],
        song_path: &Path,
        song_facts: &MediaFacts,
    ) -> MontageResult<(TimelinePlan, Vec<Option<EventHandle>>)> {
        self.host.clear_tracks()?;
        let video_track = self.host.create_track(TrackKind::Video, "Clips")?;
        let clip_audio_track = self.host.create_track(TrackKind::Audio, "Clip Audio")?;
        let song_track = self.host.create_track(TrackKind::Audio, "Song")?;

        let mut plan = TimelineScheduler::place(records, song_facts.duration);
        TimelineScheduler::sync_to_beats(&mut plan, beats);

        let mut committed: Vec<Option<EventHandle>> = Vec::with_capacity(plan.clips.len());
        for scheduled in &plan.clips {
            self.checkpoint()?;
            let record = &records[scheduled.record_index];
            let media = match record.media.as_ref() {
                Some(media) => media,
                None => {
                    committed.push(None);
                    continue;
                }
            };

            match self.host.add_event(video_track, media.handle, &scheduled.video) {
                Ok(event) => {
                    if let Some(audio) = &scheduled.audio {
                        if let Err(err) =
                            self.host.add_event(clip_audio_track, media.handle, audio)
                        {
                            warn!(
                                clip = %record.path.display(),
                                error = %err,
                                "audio placement failed, video placement kept"
                            );
                        }
                    }
                    committed.push(Some(event));
                }
                Err(err) => {
                    warn!(
                        clip = %record.path.display(),
                        error = %err,
                        "video placement failed, skipping clip"
                    );
                    committed.push(None);
                }
            }
        }

        self.host
            .add_event(song_track, song_facts.handle, &plan.song)
            .map_err(|err| MontageError::SongImport {
                path: song_path.display().to_string(),
                message: format!("could not place song: {}", err),
            })?;

        Ok((plan, committed))
    }

    /// Emit and apply effect cues per committed placement; every per-cue
    /// failure is logged and skipped
    fn apply_effects(
        &self,
        records: &[ClipRecord],
        plan: &mut TimelinePlan,
        committed: &[Option<EventHandle>],
        beats: &[TimeOffset],
    ) -> MontageResult<(Vec<Vec<EffectCue>>, usize)> {
        let scheduler = EffectScheduler::new(self.config.effect_settings());
        let mut all_cues = Vec::with_capacity(plan.clips.len());
        let mut applied = 0;

        for (scheduled, event) in plan.clips.iter().zip(committed) {
            self.checkpoint()?;
            let record = &records[scheduled.record_index];
            let cues = scheduler.cues_for(record, scheduled, beats);

            if let Some(event) = event {
                for cue in &cues {
                    match self.host.apply_cue(*event, cue) {
                        Ok(()) => applied += 1,
                        Err(err) => warn!(
                            clip = %record.path.display(),
                            error = %err,
                            "effect cue failed, skipping"
                        ),
                    }
                }
            }
            all_cues.push(cues);
        }

        Ok((all_cues, applied))
    }
}
