use std::fs;

use kfs_core::DEFAULT_SENTINEL;
use kfs_grid::{build_grid, export_csv, export_json, DenseSheet, Grid, GridOptions};
use kfs_parse::parse_lines;
use tempfile::tempdir;

fn sample_grid() -> Grid {
    let log = [
        "INFO: Time (ms) to run simulation",
        "track id 3",
        "surface id 7",
        "step id 0",
        "state momentum: 1.5",
        "step id 1",
        "state momentum: 1.4",
        "smoothed value: 9.9",
    ];
    let records = parse_lines(log, DEFAULT_SENTINEL).expect("parse");
    let opts = GridOptions {
        anchor_row: 1,
        anchor_col: 1,
        ..GridOptions::default()
    };
    build_grid(&records, &opts).expect("grid")
}

#[test]
fn dense_sheet_leaves_covered_rows_blank() {
    let sheet = DenseSheet::from_grid(&sample_grid());
    let rows: Vec<Vec<&str>> = sheet
        .rows()
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["", "", "", "", "", ""],
            vec!["", "Track ID", "Surface ID", "Step ID", "Momentum", "smoothed_val"],
            vec!["", "3", "7", "0", "1.5", "9.9"],
            vec!["", "", "", "1", "1.4", ""],
        ]
    );
}

#[test]
fn csv_export_matches_dense_rendering() {
    let dir = tempdir().expect("dir");
    let path = dir.path().join("data.csv");
    export_csv(&sample_grid(), &path).expect("csv");
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(
        text,
        ",,,,,\n,Track ID,Surface ID,Step ID,Momentum,smoothed_val\n,3,7,0,1.5,9.9\n,,,1,1.4,\n"
    );
}

#[test]
fn json_export_round_trips() {
    let dir = tempdir().expect("dir");
    let path = dir.path().join("data.json");
    let grid = sample_grid();
    export_json(&grid, &path).expect("json");
    let restored: Grid = serde_json::from_slice(&fs::read(&path).expect("read")).expect("parse");
    assert_eq!(restored, grid);
}

#[test]
fn export_into_missing_directory_fails_with_path() {
    let dir = tempdir().expect("dir");
    let path = dir.path().join("absent").join("data.json");
    let err = export_json(&sample_grid(), &path).expect_err("missing dir");
    assert_eq!(err.info().code, "kfs_grid.export");
    assert!(err.info().context.contains_key("path"));
}
