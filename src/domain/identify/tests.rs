// Unit tests for the clip filename parser

use std::path::Path;

use super::*;
use crate::domain::errors::MontageError;

#[test]
fn test_parse_opener_with_sequence() {
    let identity = parse_clip_name("[OPENER]Alice - Warzone - Verdansk - AWM - Snipe - 3").unwrap();

    assert_eq!(identity.role, ClipRole::Opener);
    assert_eq!(identity.player_name, "Alice");
    assert_eq!(identity.game, "Warzone");
    assert_eq!(identity.map, "Verdansk");
    assert_eq!(identity.gun, "AWM");
    assert_eq!(identity.clip_type, "Snipe");
    assert_eq!(identity.sequence_number, 3);
}

#[test]
fn test_parse_closer_marker() {
    let identity = parse_clip_name("[CLOSER]Dana - Warzone - Rebirth - MP5 - Ace").unwrap();
    assert_eq!(identity.role, ClipRole::Closer);
    assert_eq!(identity.player_name, "Dana");
    assert_eq!(identity.sequence_number, 1);
}

#[test]
fn test_parse_defaults_to_normal_role_and_sequence_one() {
    let identity = parse_clip_name("Bob - Warzone - Rebirth - Kar98 - Quad").unwrap();
    assert_eq!(identity.role, ClipRole::Normal);
    assert_eq!(identity.sequence_number, 1);
}

#[test]
fn test_parse_trims_segment_whitespace() {
    let identity = parse_clip_name("  Bob  -  Warzone -Rebirth-  Kar98 - Quad ").unwrap();
    assert_eq!(identity.player_name, "Bob");
    assert_eq!(identity.map, "Rebirth");
    assert_eq!(identity.gun, "Kar98");
}

#[test]
fn test_parse_is_deterministic() {
    let name = "[OPENER]Alice - Warzone - Verdansk - AWM - Snipe - 3";
    assert_eq!(parse_clip_name(name).unwrap(), parse_clip_name(name).unwrap());
}

#[test]
fn test_parse_rejects_too_few_segments() {
    let err = parse_clip_name("Bob - Warzone - Rebirth - Kar98").unwrap_err();
    assert!(matches!(err, MontageError::MalformedClipName { .. }));
}

#[test]
fn test_parse_rejects_empty_segment() {
    let err = parse_clip_name("Bob -  - Rebirth - Kar98 - Quad").unwrap_err();
    match err {
        MontageError::MalformedClipName { reason, .. } => {
            assert!(reason.contains("game"), "unexpected reason: {}", reason);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_parse_rejects_zero_sequence_number() {
    let err = parse_clip_name("Carol - Warzone - Verdansk - AWM - Snipe - 0").unwrap_err();
    assert!(matches!(err, MontageError::MalformedClipName { .. }));
}

#[test]
fn test_parse_rejects_non_numeric_sequence_number() {
    let err = parse_clip_name("Carol - Warzone - Verdansk - AWM - Snipe - three").unwrap_err();
    assert!(matches!(err, MontageError::MalformedClipName { .. }));
}

#[test]
fn test_parse_marker_without_name_is_rejected() {
    let err = parse_clip_name("[OPENER] - Warzone - Verdansk - AWM - Snipe").unwrap_err();
    match err {
        MontageError::MalformedClipName { reason, .. } => {
            assert!(reason.contains("player name"), "unexpected reason: {}", reason);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_parse_ignores_segments_past_the_sixth() {
    let identity = parse_clip_name("Bob - Warzone - Rebirth - Kar98 - Quad - 2 - extra").unwrap();
    assert_eq!(identity.sequence_number, 2);
}

#[test]
fn test_scan_missing_folder_is_fatal_and_names_the_path() {
    let err = scan_clips_folder(Path::new("no/such/folder"), &["mp4".to_string()]).unwrap_err();
    assert!(matches!(err, MontageError::NoClipsFound { .. }));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("no/such/folder"));
}

#[test]
fn test_parse_clip_path_uses_stem() {
    let identity = parse_clip_path(Path::new("clips/Bob - Warzone - Rebirth - Kar98 - Quad.mp4"))
        .unwrap();
    assert_eq!(identity.player_name, "Bob");
    assert_eq!(identity.clip_type, "Quad");
}
