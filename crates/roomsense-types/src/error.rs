//! Error types for data parsing in roomsense-types.

use thiserror::Error;

/// Errors that can occur when decoding raw sensor data into typed values.
///
/// This error type is transport-agnostic; source-specific errors (HTTP,
/// query failures) belong in roomsense-service.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A raw state string was neither numeric nor a recognized
    /// no-measurement sentinel.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A name did not match any known sensor kind.
    #[error("Unknown sensor kind: {0}")]
    UnknownKind(String),
}

/// Result type alias using roomsense-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
