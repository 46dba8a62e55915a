// Timeline scheduling - clip ordering, placement, and beat synchronization

pub mod effects;

pub use effects::{EffectScheduler, EffectSettings};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::model::{ClipRecord, Placement, TimeOffset, TrackKind};

/// One clip's committed position on the timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledClip {
    /// Index into the pipeline's ClipRecord list
    pub record_index: usize,
    pub video: Placement,
    /// Present when the clip exposes an audio stream; shares the video start
    pub audio: Option<Placement>,
}

/// Full placement plan for one montage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePlan {
    /// Song placement at offset zero on its dedicated audio track
    pub song: Placement,
    /// Clip placements in timeline order
    pub clips: Vec<ScheduledClip>,
}

/// Orders valid clips and walks them onto the timeline without overlap,
/// then optionally refines transition starts against the detected beats.
pub struct TimelineScheduler;

impl TimelineScheduler {
    /// Stable ordering of valid records: role rank (opener first, closer
    /// last), then game, map, gun ascending; ties keep input order.
    pub fn sort_indices(records: &[ClipRecord]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..records.len())
            .filter(|&i| records[i].is_valid())
            .collect();

        indices.sort_by(|&a, &b| {
            let ia = &records[a].identity;
            let ib = &records[b].identity;
            ia.role
                .rank()
                .cmp(&ib.role.rank())
                .then_with(|| ia.game.cmp(&ib.game))
                .then_with(|| ia.map.cmp(&ib.map))
                .then_with(|| ia.gun.cmp(&ib.gun))
        });
        indices
    }

    /// Place sorted clips back to back from offset zero.
    ///
    /// A clip without a decodable video stream cannot anchor a timeline
    /// position in the host editor, so it is skipped without advancing the
    /// cursor. Clips with audio get a matching audio placement at the same
    /// start.
    pub fn place(records: &[ClipRecord], song_duration: TimeOffset) -> TimelinePlan {
        let mut clips = Vec::new();
        let mut cursor = TimeOffset::ZERO;

        for index in Self::sort_indices(records) {
            let record = &records[index];
            let media = match &record.media {
                Some(media) => media,
                None => {
                    warn!(clip = %record.path.display(), "clip has no imported media, skipping");
                    continue;
                }
            };
            if !media.has_video {
                warn!(clip = %record.path.display(), "clip has no video stream, skipping");
                continue;
            }

            let video = Placement::new(TrackKind::Video, cursor, media.duration);
            let audio = media
                .has_audio
                .then(|| Placement::new(TrackKind::Audio, cursor, media.duration));

            clips.push(ScheduledClip {
                record_index: index,
                video,
                audio,
            });
            cursor = cursor + media.duration;
        }

        TimelinePlan {
            song: Placement::new(TrackKind::Audio, TimeOffset::ZERO, song_duration),
            clips,
        }
    }

    /// Move clip transition i to beat i (the opener never moves), clamped so
    /// no placement starts before its predecessor's end; placements past the
    /// beat range ripple forward the same way. The non-overlap invariant
    /// therefore holds after this pass as well.
    pub fn sync_to_beats(plan: &mut TimelinePlan, beats: &[TimeOffset]) {
        let synced = plan.clips.len().min(beats.len());

        for i in 1..plan.clips.len() {
            let prev_end = plan.clips[i - 1].video.end();
            let current = plan.clips[i].video.start;
            let target = if i < synced {
                if beats[i] < prev_end {
                    debug!(
                        clip = i,
                        beat = %beats[i],
                        "beat lands inside previous clip, clamping to its end"
                    );
                }
                beats[i].max(prev_end)
            } else {
                current.max(prev_end)
            };

            if target != current {
                let clip = &mut plan.clips[i];
                clip.video.start = target;
                if let Some(audio) = clip.audio.as_mut() {
                    audio.start = target;
                }
            }
        }
    }

    /// Check the per-track non-overlap invariant over a placement plan
    pub fn verify_non_overlap(plan: &TimelinePlan) -> bool {
        plan.clips
            .windows(2)
            .all(|pair| pair[0].video.end() <= pair[1].video.start)
    }
}
