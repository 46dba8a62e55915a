// Clip identification - filename grammar parser and folder scanning

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::errors::{MontageError, MontageResult};
use crate::domain::model::{ClipIdentity, ClipRole};

/// Segment delimiter in the clip naming grammar
const SEGMENT_DELIMITER: char = '-';
/// Case-sensitive role markers on the first segment
const OPENER_MARKER: &str = "[OPENER]";
const CLOSER_MARKER: &str = "[CLOSER]";

/// Labels for the five mandatory segments, in grammar order
const SEGMENT_LABELS: [&str; 5] = ["player name", "game", "map", "gun", "clip type"];

/// Parse a clip filename stem (no extension) into its identity.
///
/// Grammar: `[OPENER]|[CLOSER]` optional marker on the first segment, then
/// `PlayerName - Game - Map - Gun - ClipType[ - SequenceNumber]`, segments
/// trimmed of surrounding whitespace. Pure and deterministic.
pub fn parse_clip_name(stem: &str) -> MontageResult<ClipIdentity> {
    let malformed = |reason: String| MontageError::MalformedClipName {
        name: stem.to_string(),
        reason,
    };

    let mut segments: Vec<&str> = stem.split(SEGMENT_DELIMITER).map(str::trim).collect();

    let mut role = ClipRole::Normal;
    let first = segments[0];
    let stripped = if let Some(rest) = first.strip_prefix(OPENER_MARKER) {
        role = ClipRole::Opener;
        rest.trim_start()
    } else if let Some(rest) = first.strip_prefix(CLOSER_MARKER) {
        role = ClipRole::Closer;
        rest.trim_start()
    } else {
        first
    };
    segments[0] = stripped;

    if segments.len() < SEGMENT_LABELS.len() {
        return Err(malformed(format!(
            "expected at least {} segments, found {}",
            SEGMENT_LABELS.len(),
            segments.len()
        )));
    }

    for (segment, label) in segments.iter().zip(SEGMENT_LABELS.iter()) {
        if segment.is_empty() {
            return Err(malformed(format!("{} segment is empty", label)));
        }
    }

    // Optional sixth segment: positive sequence number. Segments past the
    // sixth are ignored, matching the reference parser's permissiveness.
    let sequence_number = match segments.get(SEGMENT_LABELS.len()) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(malformed(format!(
                    "sequence number '{}' is not a positive integer",
                    raw
                )))
            }
        },
        None => 1,
    };

    Ok(ClipIdentity {
        player_name: segments[0].to_string(),
        game: segments[1].to_string(),
        map: segments[2].to_string(),
        gun: segments[3].to_string(),
        clip_type: segments[4].to_string(),
        sequence_number,
        role,
    })
}

/// Parse a clip file path by its filename stem
pub fn parse_clip_path(path: &Path) -> MontageResult<ClipIdentity> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| MontageError::MalformedClipName {
            name: path.display().to_string(),
            reason: "path has no usable filename".to_string(),
        })?;
    parse_clip_name(stem)
}

/// List clip files in a folder, non-recursive, filtered by extension and
/// sorted by file name so input order is reproducible across platforms.
pub fn scan_clips_folder(folder: &Path, extensions: &[String]) -> MontageResult<Vec<PathBuf>> {
    // A missing or unreadable folder aborts the run with the path named
    std::fs::metadata(folder).map_err(|e| MontageError::NoClipsFound {
        folder: format!("{} ({})", folder.display(), e),
    })?;

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.iter().any(|want| want.eq_ignore_ascii_case(e)))
                .unwrap_or(false)
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests;
