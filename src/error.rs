use crate::analyzer::ReviewError;
use crate::azure::ArmError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AzqrError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Management API error: {0}")]
    Arm(#[from] ArmError),

    #[error("Review failed: {0}")]
    Review(#[from] ReviewError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid diagnostics file {path}: {message}")]
    DiagnosticsFile { path: PathBuf, message: String },

    #[error("Scan finished with {0} failed review(s)")]
    ScanFailed(usize),

    #[error("Scan cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ParsingFailed(String),

    #[error("Missing required setting: {0}")]
    MissingValue(&'static str),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, AzqrError>;
