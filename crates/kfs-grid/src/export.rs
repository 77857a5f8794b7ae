use std::convert::Infallible;
use std::fs;
use std::path::Path;

use kfs_core::errors::{ErrorInfo, KfsError};
use kfs_core::to_canonical_json_bytes;

use crate::cell::{replay, CellValue, SheetWriter};
use crate::layout::Grid;

/// Row-major text rendering of a grid. Merged regions keep their value in the
/// anchor row; covered rows stay blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenseSheet {
    rows: Vec<Vec<String>>,
}

impl DenseSheet {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut sheet = Self::default();
        if let Err(never) = replay(&grid.cells, &mut sheet) {
            match never {}
        }
        sheet.pad();
        sheet
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn put(&mut self, row: u32, col: u16, value: &CellValue) {
        let (row, col) = (row as usize, col as usize);
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
    }

    fn pad(&mut self) {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

impl SheetWriter for DenseSheet {
    type Error = Infallible;

    fn write(&mut self, row: u32, col: u16, value: &CellValue) -> Result<(), Infallible> {
        self.put(row, col, value);
        Ok(())
    }

    fn merge_range(
        &mut self,
        first_row: u32,
        last_row: u32,
        col: u16,
        value: &CellValue,
    ) -> Result<(), Infallible> {
        self.put(first_row, col, value);
        if self.rows.len() <= last_row as usize {
            self.rows.resize_with(last_row as usize + 1, Vec::new);
        }
        Ok(())
    }
}

fn export_error(code: &str, path: &Path, err: impl ToString) -> KfsError {
    KfsError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Writes the grid instructions as canonical JSON for a spreadsheet backend.
pub fn export_json(grid: &Grid, out_path: &Path) -> Result<(), KfsError> {
    let bytes = to_canonical_json_bytes(grid)?;
    fs::write(out_path, bytes).map_err(|err| KfsError::io("kfs_grid.export", out_path, err))
}

/// Writes the dense rendering of the grid as CSV.
pub fn export_csv(grid: &Grid, out_path: &Path) -> Result<(), KfsError> {
    let sheet = DenseSheet::from_grid(grid);
    let mut wtr = csv::Writer::from_path(out_path)
        .map_err(|err| export_error("kfs_grid.export", out_path, err))?;
    for row in sheet.rows() {
        wtr.write_record(row)
            .map_err(|err| export_error("kfs_grid.export", out_path, err))?;
    }
    wtr.flush()
        .map_err(|err| KfsError::io("kfs_grid.export", out_path, err))
}
