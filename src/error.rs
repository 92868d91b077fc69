use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Substitution file or JSON configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported schemaVersion: {0}")]
    UnsupportedSchemaVersion(u32),
}

/// Adapter-level failure. Aborts the whole ingestion run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xml error at byte {position}: {message}")]
    Xml { position: u64, message: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("xlsx error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{slots} slots per chassis do not fit the worksheet (max {max})")]
    TooManySlots { slots: u32, max: u32 },
}
