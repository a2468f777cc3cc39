//! Error types for roomsense-store.

use std::path::PathBuf;

/// Result type for roomsense-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roomsense-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to create the directory for the label log.
    #[error("Failed to create label directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to open the label log file.
    #[error("Failed to open label log {path}: {source}")]
    OpenLog {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
