//! Error types for data parsing in weatherdash-types.

use thiserror::Error;

/// Errors that can occur when parsing weather-station data.
///
/// This error type is transport-agnostic and does not include HTTP
/// errors (those belong in weatherdash-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Data was structurally valid but semantically wrong.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A wall-clock label was not in `HH:MM:SS` form.
    #[error("Invalid time label '{0}': expected HH:MM:SS")]
    InvalidTimeLabel(String),
}

/// Result type alias using weatherdash-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
