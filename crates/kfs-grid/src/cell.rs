use std::fmt;

use serde::{Deserialize, Serialize};

/// Value written into a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Track, surface and step identifiers.
    Integer(i64),
    /// Headers and raw feature/annotation text.
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

/// One write instruction. `span` counts the rows covered starting at `row`;
/// a span of 1 is a plain cell, anything larger a vertical merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub span: u32,
}

impl GridCell {
    pub fn plain(row: u32, col: u16, value: CellValue) -> Self {
        Self {
            row,
            col,
            value,
            span: 1,
        }
    }

    /// Cell covering `span` rows; one-row scopes collapse to a plain cell.
    pub fn spanning(row: u32, col: u16, value: CellValue, span: u32) -> Self {
        Self {
            row,
            col,
            value,
            span: span.max(1),
        }
    }

    pub fn is_merged(&self) -> bool {
        self.span > 1
    }

    /// Last row covered by the cell (inclusive).
    pub fn last_row(&self) -> u32 {
        self.row.saturating_add(self.span.saturating_sub(1))
    }
}

/// Spreadsheet backend receiving grid instructions.
///
/// Backends commonly reject a merge over a single row, so [`replay`] routes
/// one-row cells through [`SheetWriter::write`] and only true spans through
/// [`SheetWriter::merge_range`].
pub trait SheetWriter {
    type Error;

    fn write(&mut self, row: u32, col: u16, value: &CellValue) -> Result<(), Self::Error>;

    fn merge_range(
        &mut self,
        first_row: u32,
        last_row: u32,
        col: u16,
        value: &CellValue,
    ) -> Result<(), Self::Error>;
}

/// Feeds cells to a backend in instruction order.
pub fn replay<'a, W, I>(cells: I, writer: &mut W) -> Result<(), W::Error>
where
    W: SheetWriter,
    I: IntoIterator<Item = &'a GridCell>,
{
    for cell in cells {
        if cell.is_merged() {
            writer.merge_range(cell.row, cell.last_row(), cell.col, &cell.value)?;
        } else {
            writer.write(cell.row, cell.col, &cell.value)?;
        }
    }
    Ok(())
}
