//! Error types for roomsense-core.
//!
//! All three variants are local, recoverable conditions. The correct caller
//! behavior is to skip the affected display element (no warning row, no
//! forecast panel) rather than halt the refresh cycle: a failure in one
//! room's or sensor's computation must never prevent other rooms and
//! sensors from being evaluated in the same tick.

use thiserror::Error;

/// Errors from the estimation core.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A raw value was neither numeric nor the no-measurement sentinel.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The forecaster needs at least two historical points.
    ///
    /// Callers are expected to check the series length before invoking and
    /// simply skip forecasting otherwise; this is a guard, not a user-facing
    /// condition.
    #[error("Insufficient data: need at least {needed} samples, got {actual}")]
    InsufficientData {
        /// Minimum number of samples required.
        needed: usize,
        /// Number of samples provided.
        actual: usize,
    },

    /// The selected window has no time variance, so a line fit is undefined.
    ///
    /// Happens when every sample in the window collapses onto one instant.
    #[error("Degenerate fit: window of {samples} samples spans no time")]
    DegenerateFit {
        /// Number of samples in the degenerate window.
        samples: usize,
    },
}

impl Error {
    /// Create an insufficient-data error.
    pub fn insufficient_data(needed: usize, actual: usize) -> Self {
        Self::InsufficientData { needed, actual }
    }
}

impl From<roomsense_types::ParseError> for Error {
    fn from(err: roomsense_types::ParseError) -> Self {
        match err {
            roomsense_types::ParseError::InvalidValue(raw) => Error::InvalidValue(raw),
            roomsense_types::ParseError::UnknownKind(name) => {
                Error::InvalidValue(format!("unknown sensor kind: {name}"))
            }
            // Handle future ParseError variants (non_exhaustive)
            _ => Error::InvalidValue(err.to_string()),
        }
    }
}

/// Result type alias using roomsense-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
