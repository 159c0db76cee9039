//! Dashboard Configuration
//! Optional JSON settings file: data source, column mapping, date window and export size.

use crate::data::DateWindow;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Date window starts after it ends: {start} > {end}")]
    InvalidWindow { start: String, end: String },
}

/// Source column names, renamed to the canonical ones on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub region: String,
    pub house_type: String,
    pub deal_date: String,
    pub amount: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: "SGG_NM".to_string(),
            house_type: "HOUSE_TYPE".to_string(),
            deal_date: "DEAL_YMD".to_string(),
            amount: "OBJ_AMT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at start-up.
    pub csv_path: Option<PathBuf>,
    pub columns: ColumnNames,
    /// `strftime` format of the deal date column.
    pub date_format: String,
    pub window: DateWindow,
    /// Menu label of the view shown first.
    pub default_view: String,
    /// TTF/OTF file with Hangul glyphs for the egui window.
    pub font_path: Option<PathBuf>,
    pub export: ExportConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            columns: ColumnNames::default(),
            date_format: "%Y-%m-%d".to_string(),
            window: DateWindow::default(),
            default_view: crate::views::ViewKind::PriceTrend.label().to_string(),
            font_path: None,
            export: ExportConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Explicit path if given, else `dashboard.json` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window.start > self.window.end {
            return Err(ConfigError::InvalidWindow {
                start: self.window.start.to_string(),
                end: self.window.end.to_string(),
            });
        }
        Ok(())
    }
}
