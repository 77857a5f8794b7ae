use std::path::Path;

use kfs_core::{KfsError, ReportConfig};

pub mod grid;
pub mod inspect;

/// Reads the YAML configuration when given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<ReportConfig, KfsError> {
    match path {
        Some(path) => ReportConfig::load(path),
        None => Ok(ReportConfig::default()),
    }
}
