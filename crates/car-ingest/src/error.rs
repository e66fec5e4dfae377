//! Error types for results-directory access.
//!
//! Per-stone failures are [`car_model::DataError`]; these errors concern the
//! results directory as a whole.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Directory not found or not a directory.
    #[error("results directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for directory-level ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
