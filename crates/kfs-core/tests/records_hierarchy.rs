use kfs_core::{
    stable_hash_string, to_canonical_json_bytes, LogRecords, StepKey, StepStore, SurfaceKey,
    TrackKey,
};

fn track(raw: i64) -> Option<TrackKey> {
    Some(TrackKey::from_raw(raw))
}

fn surface(raw: i64) -> Option<SurfaceKey> {
    Some(SurfaceKey::from_raw(raw))
}

fn step(raw: i64) -> Option<StepKey> {
    Some(StepKey::from_raw(raw))
}

#[test]
fn get_or_create_builds_every_level() {
    let mut store = StepStore::new();
    store
        .record_or_default(track(3), surface(7), step(0))
        .set("Pos", "1.0, 2.0, 3.0");
    let record = store.record(track(3), surface(7), step(0)).expect("record");
    assert_eq!(record.get("Pos"), Some("1.0, 2.0, 3.0"));
    assert_eq!(store.step_count(), 1);
    assert!(store.record(track(3), surface(7), step(1)).is_none());
}

#[test]
fn last_write_wins() {
    let mut store = StepStore::new();
    store
        .record_or_default(track(1), surface(1), step(1))
        .set("Charge", "1");
    store
        .record_or_default(track(1), surface(1), step(1))
        .set("Charge", "-1");
    let record = store.record(track(1), surface(1), step(1)).expect("record");
    assert_eq!(record.get("Charge"), Some("-1"));
    assert_eq!(record.len(), 1);
}

#[test]
fn iteration_is_numeric_with_unset_first() {
    let mut store = StepStore::new();
    for raw in [10, 2, -1, 33] {
        store.record_or_default(track(raw), None, None);
    }
    store.record_or_default(None, None, None);
    let keys: Vec<_> = store.tracks().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![None, track(-1), track(2), track(10), track(33)]);
}

#[test]
fn key_display_matches_log_namespace() {
    assert_eq!(TrackKey::from_raw(3).to_string(), "track_3");
    assert_eq!(SurfaceKey::from_raw(7).to_string(), "surface_7");
    assert_eq!(StepKey::from_raw(0).to_string(), "step_0");
}

#[test]
fn records_serialize_as_ordered_entries() {
    let mut records = LogRecords::default();
    records
        .steps
        .record_or_default(track(3), surface(7), step(0))
        .set("Pos", "1.0");
    records
        .annotations
        .annotation_or_default(track(3), surface(7))
        .set("smoothed_val", "9.9");
    let bytes = to_canonical_json_bytes(&records).expect("json");
    let text = String::from_utf8(bytes).expect("utf8");
    assert_eq!(
        text,
        r#"{"annotations":{"tracks":[[3,{"surfaces":[[7,{"values":{"smoothed_val":"9.9"}}]]}]]},"steps":{"tracks":[[3,{"surfaces":[[7,{"steps":[[0,{"features":{"Pos":"1.0"}}]]}]]}]]}}"#
    );
    assert_eq!(
        stable_hash_string(&records).expect("hash"),
        stable_hash_string(&records.clone()).expect("hash")
    );
}
