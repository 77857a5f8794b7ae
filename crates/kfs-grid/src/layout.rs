//! Projection of the record stores onto a merged two-dimensional grid.
//!
//! Layout, relative to the anchor: one header row, then one row per emitted
//! step. Columns are track, surface, step, the step features (alphabetical)
//! and the surface annotations (alphabetical). Track and surface cells span
//! every row of their scope; annotations span the rows of their surface.

use std::collections::BTreeSet;

use kfs_core::errors::{ErrorInfo, KfsError};
use kfs_core::{
    stable_hash_string, LogRecords, ReportConfig, Slot, SurfaceKey, SurfaceSteps, TrackKey,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cell::{CellValue, GridCell};

pub const TRACK_HEADER: &str = "Track ID";
pub const SURFACE_HEADER: &str = "Surface ID";
pub const STEP_HEADER: &str = "Step ID";

/// Placement and truncation settings for [`build_grid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOptions {
    pub anchor_row: u32,
    pub anchor_col: u16,
    /// Surfaces kept per track, lowest identifiers first.
    pub max_surfaces_per_track: usize,
    pub sheet_name: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for GridOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            anchor_row: config.anchor_row,
            anchor_col: config.anchor_col,
            max_surfaces_per_track: config.max_surfaces_per_track,
            sheet_name: config.sheet_name.clone(),
        }
    }
}

impl GridOptions {
    pub fn with_max_surfaces(mut self, max: usize) -> Self {
        self.max_surfaces_per_track = max;
        self
    }
}

/// Track whose surfaces exceeded the configured cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncatedTrack {
    pub track: Slot<TrackKey>,
    pub kept: usize,
    pub dropped: usize,
}

/// What ended up in the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub tracks: usize,
    pub surfaces: usize,
    pub step_rows: usize,
    pub feature_columns: Vec<String>,
    pub annotation_columns: Vec<String>,
    pub truncated: Vec<TruncatedTrack>,
}

impl GridSummary {
    pub fn dropped_surfaces(&self) -> usize {
        self.truncated.iter().map(|track| track.dropped).sum()
    }
}

/// Ordered write instructions for one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub sheet: String,
    pub cells: Vec<GridCell>,
    pub summary: GridSummary,
}

impl Grid {
    /// Stable SHA-256 of the canonical JSON form.
    pub fn digest(&self) -> Result<String, KfsError> {
        stable_hash_string(self)
    }

    pub fn merged_cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter().filter(|cell| cell.is_merged())
    }

    /// Cell anchored at the given position, if any.
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
    }
}

struct TrackPlan<'a> {
    track: Slot<TrackKey>,
    surfaces: Vec<(Slot<SurfaceKey>, &'a SurfaceSteps)>,
}

fn id_value(raw: Option<i64>) -> CellValue {
    raw.map_or_else(|| CellValue::text(""), CellValue::Integer)
}

fn column(base: u16, offset: usize) -> Result<u16, KfsError> {
    u16::try_from(offset)
        .ok()
        .and_then(|offset| base.checked_add(offset))
        .ok_or_else(|| {
            KfsError::Grid(
                ErrorInfo::new("kfs_grid.column_overflow", "grid exceeds the column limit")
                    .with_context("anchor_col", base.to_string())
                    .with_context("offset", offset.to_string()),
            )
        })
}

fn next_row(row: u32) -> Result<u32, KfsError> {
    row.checked_add(1).ok_or_else(|| {
        KfsError::Grid(
            ErrorInfo::new("kfs_grid.row_overflow", "grid exceeds the row limit")
                .with_context("row", row.to_string()),
        )
    })
}

fn select<'a>(
    records: &'a LogRecords,
    cap: usize,
    summary: &mut GridSummary,
) -> Vec<TrackPlan<'a>> {
    let mut plans = Vec::new();
    for (track, surfaces) in records.steps.tracks() {
        let available: Vec<_> = surfaces
            .surfaces()
            .filter(|(_, steps)| !steps.is_empty())
            .collect();
        let total = available.len();
        let kept: Vec<_> = available.into_iter().take(cap).collect();
        if total > kept.len() {
            warn!(
                track = ?track.map(|key| key.as_raw()),
                kept = kept.len(),
                dropped = total - kept.len(),
                "surface cap reached; extra surfaces omitted"
            );
            summary.truncated.push(TruncatedTrack {
                track,
                kept: kept.len(),
                dropped: total - kept.len(),
            });
        }
        if !kept.is_empty() {
            plans.push(TrackPlan {
                track,
                surfaces: kept,
            });
        }
    }
    plans
}

/// Builds the grid instructions for the completed record stores.
pub fn build_grid(records: &LogRecords, opts: &GridOptions) -> Result<Grid, KfsError> {
    let mut summary = GridSummary::default();
    let plans = select(records, opts.max_surfaces_per_track, &mut summary);

    let mut features = BTreeSet::new();
    let mut annotations = BTreeSet::new();
    for plan in &plans {
        for (surface, steps) in &plan.surfaces {
            for (_, record) in steps.steps() {
                features.extend(record.features().map(|(name, _)| name));
            }
            if let Some(annotation) = records.annotations.annotation(plan.track, *surface) {
                annotations.extend(annotation.values().map(|(name, _)| name));
            }
        }
    }
    let features: Vec<&str> = features.into_iter().collect();
    let annotations: Vec<&str> = annotations.into_iter().collect();

    let track_col = opts.anchor_col;
    let surface_col = column(track_col, 1)?;
    let step_col = column(track_col, 2)?;
    let feature_cols = features
        .iter()
        .enumerate()
        .map(|(idx, _)| column(track_col, 3 + idx))
        .collect::<Result<Vec<_>, _>>()?;
    let annotation_cols = annotations
        .iter()
        .enumerate()
        .map(|(idx, _)| column(track_col, 3 + features.len() + idx))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cells = Vec::new();
    let header = opts.anchor_row;
    cells.push(GridCell::plain(header, track_col, CellValue::text(TRACK_HEADER)));
    cells.push(GridCell::plain(header, surface_col, CellValue::text(SURFACE_HEADER)));
    cells.push(GridCell::plain(header, step_col, CellValue::text(STEP_HEADER)));
    for (name, col) in features.iter().zip(&feature_cols) {
        cells.push(GridCell::plain(header, *col, CellValue::text(*name)));
    }
    for (name, col) in annotations.iter().zip(&annotation_cols) {
        cells.push(GridCell::plain(header, *col, CellValue::text(*name)));
    }

    let mut row = next_row(header)?;
    for plan in &plans {
        let track_start = row;
        for (surface, steps) in &plan.surfaces {
            let surface_start = row;
            for (step, record) in steps.steps() {
                cells.push(GridCell::plain(
                    row,
                    step_col,
                    id_value(step.map(|key| key.as_raw())),
                ));
                for (name, col) in features.iter().zip(&feature_cols) {
                    if let Some(value) = record.get(name) {
                        cells.push(GridCell::plain(row, *col, CellValue::text(value)));
                    }
                }
                row = next_row(row)?;
                summary.step_rows += 1;
            }
            let span = row - surface_start;
            cells.push(GridCell::spanning(
                surface_start,
                surface_col,
                id_value(surface.map(|key| key.as_raw())),
                span,
            ));
            if let Some(annotation) = records.annotations.annotation(plan.track, *surface) {
                for (name, col) in annotations.iter().zip(&annotation_cols) {
                    if let Some(value) = annotation.get(name) {
                        cells.push(GridCell::spanning(
                            surface_start,
                            *col,
                            CellValue::text(value),
                            span,
                        ));
                    }
                }
            }
            summary.surfaces += 1;
        }
        cells.push(GridCell::spanning(
            track_start,
            track_col,
            id_value(plan.track.map(|key| key.as_raw())),
            row - track_start,
        ));
        summary.tracks += 1;
    }

    summary.feature_columns = features.iter().map(|name| name.to_string()).collect();
    summary.annotation_columns = annotations.iter().map(|name| name.to_string()).collect();
    debug!(
        cells = cells.len(),
        tracks = summary.tracks,
        rows = summary.step_rows,
        "grid built"
    );
    Ok(Grid {
        sheet: opts.sheet_name.clone(),
        cells,
        summary,
    })
}
