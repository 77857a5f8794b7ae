use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, KfsError};

/// Phrase that opens the data-bearing region of a fitter log.
pub const DEFAULT_SENTINEL: &str = "INFO: Time (ms) to run simulation";

/// Surfaces emitted per track unless configured otherwise.
pub const DEFAULT_MAX_SURFACES: usize = 11;

/// YAML-configurable parameters for a report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Start sentinel; matched case- and whitespace-insensitively.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
    /// Cap on surfaces rendered per track, in ascending surface order.
    #[serde(default = "default_max_surfaces")]
    pub max_surfaces_per_track: usize,
    /// Zero-based row of the header line.
    #[serde(default = "default_anchor")]
    pub anchor_row: u32,
    /// Zero-based column of the track id column.
    #[serde(default = "default_anchor")]
    pub anchor_col: u16,
    /// Name of the emitted sheet.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_max_surfaces() -> usize {
    DEFAULT_MAX_SURFACES
}

fn default_anchor<T: From<u8>>() -> T {
    T::from(2)
}

fn default_sheet_name() -> String {
    "data".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sentinel: default_sentinel(),
            max_surfaces_per_track: default_max_surfaces(),
            anchor_row: default_anchor(),
            anchor_col: default_anchor(),
            sheet_name: default_sheet_name(),
        }
    }
}

impl ReportConfig {
    /// Parses a YAML document; missing fields take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, KfsError> {
        let config: Self = serde_yaml::from_str(text).map_err(|err| {
            KfsError::Config(ErrorInfo::new("kfs_core.config_parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, KfsError> {
        let text = fs::read_to_string(path)
            .map_err(|err| KfsError::io("kfs_core.config_read", path, err))?;
        Self::from_yaml(&text).map_err(|err| match err {
            KfsError::Config(info) => {
                KfsError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> Result<(), KfsError> {
        if self.sentinel.trim().is_empty() {
            return Err(KfsError::Config(
                ErrorInfo::new("kfs_core.config_sentinel", "start sentinel must not be empty")
                    .with_hint("use the phrase printed before the per-track dump"),
            ));
        }
        if self.sheet_name.is_empty() {
            return Err(KfsError::Config(ErrorInfo::new(
                "kfs_core.config_sheet",
                "sheet name must not be empty",
            )));
        }
        Ok(())
    }
}
