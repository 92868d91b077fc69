use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::adapters::csv_tags::LEGACY_DELIMITER;
use crate::adapters::render::{GridLayout, DEFAULT_CHANNELS, DEFAULT_SLOTS};
use crate::error::ConfigError;

pub const SCHEMA_VERSION: u32 = 1;

/// Application settings, `iogen.json` in the working directory unless
/// `--config` names another file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IogenConfig {
    pub schema_version: u32,
    /// Field delimiter of old exports (`--old`).
    pub legacy_delimiter: char,
    pub grid_slots: u32,
    pub grid_channels: u32,
    pub xlsx_slots: u32,
    /// Workbook directory; the input's directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for IogenConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            legacy_delimiter: LEGACY_DELIMITER as char,
            grid_slots: DEFAULT_SLOTS,
            grid_channels: DEFAULT_CHANNELS,
            xlsx_slots: DEFAULT_SLOTS,
            output_dir: None,
        }
    }
}

impl IogenConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content, path)
    }

    fn from_json(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        if config.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchemaVersion(config.schema_version));
        }
        Ok(config)
    }

    pub fn grid_layout(&self) -> GridLayout {
        GridLayout {
            slots: self.grid_slots,
            channels: self.grid_channels,
        }
    }

    /// Legacy delimiter as a CSV byte; non-ASCII values fall back to `?`.
    pub fn legacy_delimiter_byte(&self) -> u8 {
        u8::try_from(self.legacy_delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(LEGACY_DELIMITER)
    }
}
