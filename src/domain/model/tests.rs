// Unit tests for domain models

use super::*;

#[test]
fn test_time_offset_from_secs() {
    assert_eq!(TimeOffset::from_secs_f64(1.5).as_millis(), 1500);
    assert_eq!(TimeOffset::from_secs_f64(0.0), TimeOffset::ZERO);
    assert_eq!(TimeOffset::from_secs_f64(-3.0), TimeOffset::ZERO);
    assert_eq!(TimeOffset::from_secs_f64(f64::NAN), TimeOffset::ZERO);
}

#[test]
fn test_time_offset_arithmetic() {
    let a = TimeOffset::from_millis(2500);
    let b = TimeOffset::from_millis(1000);

    assert_eq!((a + b).as_millis(), 3500);
    assert_eq!(a.delta_millis(b), 1500);
    assert_eq!(b.delta_millis(a), -1500);
    assert_eq!(b.saturating_sub(a), TimeOffset::ZERO);
    assert_eq!(a.saturating_sub(b).as_millis(), 1500);
}

#[test]
fn test_time_offset_ordering() {
    let mut offsets = vec![
        TimeOffset::from_millis(900),
        TimeOffset::ZERO,
        TimeOffset::from_millis(450),
    ];
    offsets.sort();
    assert_eq!(
        offsets,
        vec![
            TimeOffset::ZERO,
            TimeOffset::from_millis(450),
            TimeOffset::from_millis(900),
        ]
    );
}

#[test]
fn test_time_offset_display() {
    assert_eq!(TimeOffset::from_millis(90_500).to_string(), "1:30.500");
    assert_eq!(TimeOffset::from_secs_f64(3723.25).to_string(), "1:02:03.250");
    assert_eq!(TimeOffset::ZERO.to_string(), "0:00.000");
}

#[test]
fn test_clip_role_rank_ordering() {
    assert!(ClipRole::Opener.rank() < ClipRole::Normal.rank());
    assert!(ClipRole::Normal.rank() < ClipRole::Closer.rank());
}

#[test]
fn test_placement_interval_is_half_open() {
    let placement = Placement::new(
        TrackKind::Video,
        TimeOffset::from_secs_f64(10.0),
        TimeOffset::from_secs_f64(5.0),
    );

    assert_eq!(placement.end(), TimeOffset::from_secs_f64(15.0));
    assert!(placement.contains(TimeOffset::from_secs_f64(10.0)));
    assert!(placement.contains(TimeOffset::from_secs_f64(14.999)));
    assert!(!placement.contains(TimeOffset::from_secs_f64(15.0)));
    assert!(!placement.contains(TimeOffset::from_secs_f64(9.999)));
}

#[test]
fn test_name_tag_text() {
    let identity = ClipIdentity {
        player_name: "Alice".to_string(),
        game: "Warzone".to_string(),
        map: "Verdansk".to_string(),
        gun: "AWM".to_string(),
        clip_type: "Snipe".to_string(),
        sequence_number: 1,
        role: ClipRole::Normal,
    };
    assert_eq!(identity.name_tag(), "Alice - Snipe");
}

#[test]
fn test_clip_record_validity() {
    let identity = ClipIdentity {
        player_name: "Bob".to_string(),
        game: "Warzone".to_string(),
        map: "Rebirth".to_string(),
        gun: "Kar98".to_string(),
        clip_type: "Quad".to_string(),
        sequence_number: 2,
        role: ClipRole::Opener,
    };
    let mut record = ClipRecord::new(identity, PathBuf::from("clips/a.mp4"));
    assert!(record.is_valid());

    record.rejections.push("frame rate below minimum".to_string());
    assert!(!record.is_valid());
}
