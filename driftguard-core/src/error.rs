//! Error types for the driftguard-core crate.
//!
//! The drift engine itself is total and never returns these; they surface only
//! where datasets are loaded and configuration is resolved.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for dataset loading and collaborator operations.
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("Data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Unsupported format: {extension}. Use .csv, .json or .jsonl")]
    UnsupportedFormat { extension: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl DriftError {
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Whether this error means an input file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<figment::Error> for DriftError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
