use kfs_core::{StepKey, SurfaceKey, TrackKey, DEFAULT_SENTINEL};
use kfs_parse::parse_lines;

#[test]
fn feature_without_identifiers_attaches_to_unset_context() {
    let log = ["INFO: Time (ms) to run simulation", "state pos: (1, 2, 3)"];
    let records = parse_lines(log, DEFAULT_SENTINEL).expect("never raises");
    let record = records.steps.record(None, None, None).expect("unset context");
    assert_eq!(record.get("Pos"), Some("1, 2, 3"));
}

#[test]
fn partial_context_keeps_known_levels() {
    let log = [
        "INFO: Time (ms) to run simulation",
        "track id 4",
        "state charge: 1",
        "smoothed value: 0.5",
    ];
    let records = parse_lines(log, DEFAULT_SENTINEL).expect("parse");
    let track = Some(TrackKey::from_raw(4));
    assert!(records.steps.record(track, None, None).is_some());
    let annotation = records.annotations.annotation(track, None).expect("annotation");
    assert_eq!(annotation.get("smoothed_val"), Some("0.5"));
}

#[test]
fn context_carries_over_between_tracks() {
    let log = [
        "INFO: Time (ms) to run simulation",
        "track id 1",
        "surface id 2",
        "step id 3",
        "track id 5",
        "state charge: 1",
    ];
    let records = parse_lines(log, DEFAULT_SENTINEL).expect("parse");
    let record = records.steps.record(
        Some(TrackKey::from_raw(5)),
        Some(SurfaceKey::from_raw(2)),
        Some(StepKey::from_raw(3)),
    );
    assert!(record.is_some());
}
