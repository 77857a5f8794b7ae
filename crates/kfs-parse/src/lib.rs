//! Reconstructs the track -> surface -> step hierarchy from Kalman fitter logs.

pub mod classify;
pub mod parser;

pub use classify::{classify, covariance_key, Level, LineKind, Sentinel, SMOOTHED_VALUE};
pub use parser::{
    parse_file, parse_lines, parse_reader, LogHierarchyParser, ParseContext, ParseStats,
};
