// Audio feature detection - event selection policy and detectors

pub mod beats;
pub mod kills;

pub use beats::BeatDetector;
pub use kills::KillDetector;

use crate::domain::model::{DetectedEvent, TimeOffset};

/// Thresholding and spacing policy shared by both detectors
#[derive(Debug, Clone, Copy)]
pub struct EventPolicy {
    /// Candidates scoring below this are discarded
    pub threshold: f64,
    /// Minimum gap between two kept events
    pub min_interval: TimeOffset,
}

impl EventPolicy {
    pub fn new(threshold: f64, min_interval: TimeOffset) -> Self {
        Self {
            threshold,
            min_interval,
        }
    }
}

/// Reduce raw onset candidates to an ordered, deduplicated event sequence.
///
/// Candidates below the score threshold are dropped; the rest are sorted
/// ascending by time (stable, so the earlier candidate wins any tie) and
/// kept greedily whenever the gap from the last kept event is at least
/// `min_interval`. The output is strictly ascending even for a zero
/// minimum interval.
pub fn select_events(candidates: &[DetectedEvent], policy: &EventPolicy) -> Vec<TimeOffset> {
    let mut passing: Vec<TimeOffset> = candidates
        .iter()
        .filter(|c| c.score >= policy.threshold)
        .map(|c| c.at)
        .collect();
    passing.sort();

    let mut kept: Vec<TimeOffset> = Vec::with_capacity(passing.len());
    for at in passing {
        match kept.last() {
            Some(&last) => {
                let gap = at.delta_millis(last);
                if gap > 0 && gap as u64 >= policy.min_interval.as_millis() {
                    kept.push(at);
                }
            }
            None => kept.push(at),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(seconds: f64, score: f64) -> DetectedEvent {
        DetectedEvent::new(TimeOffset::from_secs_f64(seconds), score)
    }

    fn policy(threshold: f64, min_interval_secs: f64) -> EventPolicy {
        EventPolicy::new(threshold, TimeOffset::from_secs_f64(min_interval_secs))
    }

    #[test]
    fn test_select_filters_below_threshold() {
        let candidates = vec![ev(1.0, 0.9), ev(3.0, 0.2), ev(5.0, 0.8)];
        let kept = select_events(&candidates, &policy(0.7, 0.5));
        assert_eq!(
            kept,
            vec![TimeOffset::from_secs_f64(1.0), TimeOffset::from_secs_f64(5.0)]
        );
    }

    #[test]
    fn test_select_enforces_min_interval_earliest_wins() {
        // 1.2 and 1.4 fall inside the 0.5s window after 1.0; earliest kept
        let candidates = vec![ev(1.4, 0.99), ev(1.0, 0.8), ev(1.2, 0.95), ev(2.0, 0.8)];
        let kept = select_events(&candidates, &policy(0.7, 0.5));
        assert_eq!(
            kept,
            vec![TimeOffset::from_secs_f64(1.0), TimeOffset::from_secs_f64(2.0)]
        );
    }

    #[test]
    fn test_select_output_is_strictly_ascending() {
        let candidates = vec![ev(2.0, 0.9), ev(2.0, 0.9), ev(1.0, 0.9), ev(1.0, 0.95)];
        let kept = select_events(&candidates, &policy(0.5, 0.0));
        assert_eq!(
            kept,
            vec![TimeOffset::from_secs_f64(1.0), TimeOffset::from_secs_f64(2.0)]
        );
    }

    #[test]
    fn test_select_adjacent_gaps_respect_min_interval() {
        let candidates: Vec<DetectedEvent> =
            (0..40).map(|i| ev(i as f64 * 0.2, 0.9)).collect();
        let min_interval = TimeOffset::from_secs_f64(0.5);
        let kept = select_events(&candidates, &EventPolicy::new(0.5, min_interval));

        for pair in kept.windows(2) {
            let gap = pair[1].delta_millis(pair[0]);
            assert!(gap as u64 >= min_interval.as_millis());
        }
    }

    #[test]
    fn test_select_is_subsequence_of_filtered_input() {
        let candidates = vec![ev(0.0, 0.9), ev(0.3, 0.9), ev(0.6, 0.9), ev(1.5, 0.9)];
        let kept = select_events(&candidates, &policy(0.5, 0.5));
        let input_times: Vec<TimeOffset> = candidates.iter().map(|c| c.at).collect();
        for at in &kept {
            assert!(input_times.contains(at));
        }
        assert_eq!(
            kept,
            vec![
                TimeOffset::ZERO,
                TimeOffset::from_secs_f64(0.6),
                TimeOffset::from_secs_f64(1.5),
            ]
        );
    }

    #[test]
    fn test_select_empty_input() {
        assert!(select_events(&[], &policy(0.7, 0.5)).is_empty());
    }
}
