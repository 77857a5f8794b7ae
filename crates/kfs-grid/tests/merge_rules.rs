use kfs_core::DEFAULT_SENTINEL;
use kfs_grid::{build_grid, replay, CellValue, GridOptions, SheetWriter};
use kfs_parse::parse_lines;

#[derive(Default)]
struct RecordingSheet {
    writes: Vec<(u32, u16, CellValue)>,
    merges: Vec<(u32, u32, u16, CellValue)>,
}

impl SheetWriter for RecordingSheet {
    type Error = String;

    fn write(&mut self, row: u32, col: u16, value: &CellValue) -> Result<(), String> {
        self.writes.push((row, col, value.clone()));
        Ok(())
    }

    fn merge_range(
        &mut self,
        first_row: u32,
        last_row: u32,
        col: u16,
        value: &CellValue,
    ) -> Result<(), String> {
        if first_row >= last_row {
            return Err(format!("one-row merge at {first_row}:{col}"));
        }
        self.merges.push((first_row, last_row, col, value.clone()));
        Ok(())
    }
}

fn log_with_steps(steps: usize) -> Vec<String> {
    let mut lines = vec![
        "INFO: Time (ms) to run simulation".to_string(),
        "track id 1".to_string(),
        "surface id 4".to_string(),
    ];
    for step in 0..steps {
        lines.push(format!("step id {step}"));
        lines.push(format!("state charge: {step}"));
    }
    lines.push("smoothed value: 0.5".to_string());
    lines
}

#[test]
fn three_steps_merge_track_and_surface() {
    let records = parse_lines(log_with_steps(3), DEFAULT_SENTINEL).expect("parse");
    let grid = build_grid(&records, &GridOptions::default()).expect("grid");
    let mut sheet = RecordingSheet::default();
    replay(&grid.cells, &mut sheet).expect("replay");

    assert_eq!(
        sheet.merges,
        vec![
            (3, 5, 3, CellValue::Integer(4)),
            (3, 5, 6, CellValue::text("0.5")),
            (3, 5, 2, CellValue::Integer(1)),
        ]
    );
    let step_cells: Vec<_> = sheet
        .writes
        .iter()
        .filter(|(row, col, _)| *col == 4 && *row > 2)
        .map(|(row, _, value)| (*row, value.clone()))
        .collect();
    assert_eq!(
        step_cells,
        vec![
            (3, CellValue::Integer(0)),
            (4, CellValue::Integer(1)),
            (5, CellValue::Integer(2)),
        ]
    );
}

#[test]
fn single_step_is_written_without_merges() {
    let records = parse_lines(log_with_steps(1), DEFAULT_SENTINEL).expect("parse");
    let grid = build_grid(&records, &GridOptions::default()).expect("grid");
    assert_eq!(grid.merged_cells().count(), 0);

    let mut sheet = RecordingSheet::default();
    replay(&grid.cells, &mut sheet).expect("replay");
    assert!(sheet.merges.is_empty());
    assert!(sheet.writes.contains(&(3, 2, CellValue::Integer(1))));
    assert!(sheet.writes.contains(&(3, 3, CellValue::Integer(4))));
    assert!(sheet.writes.contains(&(3, 6, CellValue::text("0.5"))));
}

#[test]
fn track_spans_all_surface_rows() {
    let log = [
        "INFO: Time (ms) to run simulation",
        "track id 2",
        "surface id 1",
        "step id 0",
        "state charge: 1",
        "surface id 2",
        "step id 0",
        "state charge: 1",
        "step id 1",
        "state charge: 1",
        "track id 3",
        "surface id 1",
        "step id 0",
        "state charge: 1",
    ];
    let records = parse_lines(log, DEFAULT_SENTINEL).expect("parse");
    let grid = build_grid(&records, &GridOptions::default()).expect("grid");

    let track_two = grid.cell_at(3, 2).expect("track 2");
    assert_eq!(track_two.value, CellValue::Integer(2));
    assert_eq!(track_two.span, 3);
    let first_surface = grid.cell_at(3, 3).expect("surface 1");
    assert!(!first_surface.is_merged());
    let second_surface = grid.cell_at(4, 3).expect("surface 2");
    assert_eq!(second_surface.span, 2);
    let track_three = grid.cell_at(6, 2).expect("track 3");
    assert_eq!(track_three.value, CellValue::Integer(3));
    assert!(!track_three.is_merged());
    assert!(grid.merged_cells().all(|cell| cell.span >= 2));
}
