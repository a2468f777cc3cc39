//! Error types for roomsense-service.

use thiserror::Error;

/// Errors from the external data sources.
///
/// All of these resolve to the same caller behavior: log, fall back to
/// synthetic data for the tick, and keep running. The distinction exists
/// for the logs, not for control flow.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request construction or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("Source returned {status} for {url}")]
    Status {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// The request URL.
        url: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected payload from {url}: {message}")]
    Payload {
        /// The request URL.
        url: String,
        /// What was wrong with it.
        message: String,
    },

    /// A timestamp in the response could not be parsed.
    #[error("Invalid timestamp '{0}' in source response")]
    InvalidTimestamp(String),
}

/// Result type alias for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
