//! Error types for dataset ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading datasets.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to read a metadata sidecar.
    #[error("failed to read metadata {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata sidecar is not valid JSON for dataset metadata.
    #[error("invalid metadata in {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Value that cannot be read as a timestamp.
    #[error("column '{column}': cannot read '{value}' as a timestamp")]
    InvalidTimestamp { column: String, value: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
