use kfs_core::{TrackKey, DEFAULT_SENTINEL};
use kfs_grid::{build_grid, CellValue, GridOptions, TruncatedTrack};
use kfs_parse::parse_lines;

fn fifteen_surfaces() -> Vec<String> {
    let mut lines = vec![
        "INFO: Time (ms) to run simulation".to_string(),
        "track id 0".to_string(),
    ];
    // descending on purpose; output order must not follow the log
    for surface in (1..=15).rev() {
        lines.push(format!("surface id {surface}"));
        lines.push("step id 0".to_string());
        lines.push(format!("state charge: {surface}"));
    }
    lines
}

#[test]
fn cap_keeps_lowest_surfaces_in_order() {
    let records = parse_lines(fifteen_surfaces(), DEFAULT_SENTINEL).expect("parse");
    let opts = GridOptions::default().with_max_surfaces(11);
    let grid = build_grid(&records, &opts).expect("cap is not an error");

    let surfaces: Vec<_> = grid
        .cells
        .iter()
        .filter(|cell| cell.col == 3 && cell.row > 2)
        .map(|cell| cell.value.clone())
        .collect();
    let expected: Vec<_> = (1..=11).map(CellValue::Integer).collect();
    assert_eq!(surfaces, expected);
    assert_eq!(grid.summary.surfaces, 11);
    assert_eq!(
        grid.summary.truncated,
        vec![TruncatedTrack {
            track: Some(TrackKey::from_raw(0)),
            kept: 11,
            dropped: 4,
        }]
    );
    assert_eq!(grid.summary.dropped_surfaces(), 4);
}

#[test]
fn default_cap_is_eleven() {
    let records = parse_lines(fifteen_surfaces(), DEFAULT_SENTINEL).expect("parse");
    let grid = build_grid(&records, &GridOptions::default()).expect("grid");
    assert_eq!(grid.summary.surfaces, 11);
}

#[test]
fn zero_cap_drops_the_track() {
    let records = parse_lines(fifteen_surfaces(), DEFAULT_SENTINEL).expect("parse");
    let grid = build_grid(&records, &GridOptions::default().with_max_surfaces(0)).expect("grid");
    assert_eq!(grid.summary.tracks, 0);
    assert_eq!(grid.summary.dropped_surfaces(), 15);
}
