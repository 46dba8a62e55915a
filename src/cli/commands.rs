//! Command execution logic

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::adapters::{FfprobeAdapter, FixedOnsetAdapter, MemoryHostAdapter};
use crate::adapters::host_memory::ProjectSnapshot;
use crate::cli::args::{BuildArgs, ParseArgs, ValidateArgs};
use crate::config::MontageConfig;
use crate::domain::identify::{parse_clip_path, scan_clips_folder};
use crate::domain::model::ClipRecord;
use crate::domain::validate::ClipValidator;
use crate::pipeline::{MontageOutcome, MontagePipeline, RunMode};
use crate::ports::{HostEditorPort, QualityProbePort};

#[derive(Serialize)]
struct BuildDump<'a> {
    outcome: &'a MontageOutcome,
    project: ProjectSnapshot,
}

/// Execute the build command
pub fn execute_build(args: BuildArgs) -> Result<()> {
    let config = MontageConfig::load(args.config.as_deref())?;

    let clips_folder = args
        .clips
        .or_else(|| config.clips_folder.clone())
        .context("no clips folder given; pass --clips or set clips_folder in montagecut.toml")?;
    let song_path = args
        .song
        .or_else(|| config.song_path.clone())
        .context("no song given; pass --song or set song_path in montagecut.toml")?;
    let mode = if args.quick {
        RunMode::Quick
    } else {
        RunMode::Full
    };

    let probe: Arc<dyn QualityProbePort> =
        Arc::new(FfprobeAdapter::new().with_timeout(config.probe_timeout()));
    let host = Arc::new(MemoryHostAdapter::new(Arc::clone(&probe)));
    // Beats fall back to the configured BPM grid; kills use the stand-in
    // onset list until a real audio analysis backend lands.
    let pipeline = MontagePipeline::new(
        Arc::clone(&host) as Arc<dyn HostEditorPort>,
        probe,
        Arc::new(FixedOnsetAdapter::silent()),
        Arc::new(FixedOnsetAdapter::default()),
        config,
    );

    info!(
        clips = %clips_folder.display(),
        song = %song_path.display(),
        quick = args.quick,
        "starting montage run"
    );
    let outcome = pipeline.run(&clips_folder, &song_path, mode)?;

    if args.json {
        let dump = BuildDump {
            outcome: &outcome,
            project: host.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    let report = &outcome.report;
    println!(
        "Montage plan: {} parsed, {} valid, {} placed, {} beats, {} cues",
        report.parsed, report.valid, report.placed, report.beats, report.cues_applied
    );
    println!(
        "  song  {} +{}",
        outcome.plan.song.start, outcome.plan.song.duration
    );
    for (slot, scheduled) in outcome.plan.clips.iter().enumerate() {
        let record = &outcome.records[scheduled.record_index];
        let cue_count = outcome.cues.get(slot).map_or(0, Vec::len);
        println!(
            "  {:>2}. [{}] {}  {} +{}  ({} kills, {} cues)",
            slot + 1,
            record.identity.role,
            record.identity.name_tag(),
            scheduled.video.start,
            scheduled.video.duration,
            record.kills.len(),
            cue_count
        );
    }
    Ok(())
}

/// Execute the parse command
pub fn execute_parse(args: ParseArgs) -> Result<()> {
    let config = MontageConfig::default();
    let files = scan_clips_folder(&args.clips, &config.clip_extensions)?;
    if files.is_empty() {
        anyhow::bail!("no clip files found in {}", args.clips.display());
    }

    let mut malformed = 0usize;
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match parse_clip_path(path) {
            Ok(identity) => println!(
                "ok    {}  [{}] {} / {} / {} / {} / {} #{}",
                name,
                identity.role,
                identity.player_name,
                identity.game,
                identity.map,
                identity.gun,
                identity.clip_type,
                identity.sequence_number
            ),
            Err(err) => {
                malformed += 1;
                println!("error {}  {}", name, err);
            }
        }
    }
    println!("{} files, {} malformed", files.len(), malformed);
    Ok(())
}

/// Execute the validate command
pub fn execute_validate(args: ValidateArgs) -> Result<()> {
    let config = MontageConfig::load(args.config.as_deref())?;
    let probe = FfprobeAdapter::new().with_timeout(config.probe_timeout());
    let validator = ClipValidator::new(config.min_frame_rate);

    let files = scan_clips_folder(&args.clips, &config.clip_extensions)?;
    if files.is_empty() {
        anyhow::bail!("no clip files found in {}", args.clips.display());
    }

    let mut invalid = 0usize;
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let identity = match parse_clip_path(path) {
            Ok(identity) => identity,
            Err(err) => {
                invalid += 1;
                println!("invalid {}  {}", name, err);
                continue;
            }
        };
        let record = ClipRecord::new(identity, path.clone());
        let report = probe.probe(path)?;
        let reasons = validator.rejection_reasons(&record, &report);
        if reasons.is_empty() {
            println!("valid   {}", name);
        } else {
            invalid += 1;
            println!("invalid {}  {}", name, reasons.join("; "));
        }
    }
    println!("{} files, {} invalid", files.len(), invalid);
    Ok(())
}
