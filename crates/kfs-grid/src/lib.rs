//! Merged-cell report grids for Kalman fitter step records.

pub mod cell;
pub mod export;
pub mod layout;

pub use cell::{replay, CellValue, GridCell, SheetWriter};
pub use export::{export_csv, export_json, DenseSheet};
pub use layout::{
    build_grid, Grid, GridOptions, GridSummary, TruncatedTrack, STEP_HEADER, SURFACE_HEADER,
    TRACK_HEADER,
};
