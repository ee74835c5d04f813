//! Error types for weatherdash-core.
//!
//! The analytics engine itself never fails: it is a total function over
//! validated readings. Errors here come from the layers around it.
//!
//! ## Error Classification
//!
//! | Error Type | Strategy | Rationale |
//! |------------|----------|-----------|
//! | [`Error::Parse`] | Do not retry | Station sent a malformed record |
//! | [`Error::InvalidReading`] | Drop the sample | Upstream validation rejected it |
//! | [`Error::InvalidConfig`] | Do not retry | Fix configuration and restart |
//! | [`Error::Station`] | Retry on next poll | Station may come back online |
//! | `Error::Client` | Retry on next poll | Network errors are usually transient |

use thiserror::Error;

use weatherdash_types::ParseError;

/// Errors that can occur around the analytics engine.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to parse data received from the station.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A reading failed validation.
    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The station could not produce data.
    #[error("Station error: {0}")]
    Station(String),

    /// HTTP client error talking to the station.
    #[cfg(feature = "station-client")]
    #[error(transparent)]
    Client(#[from] crate::client::ClientError),
}

impl Error {
    /// Whether the operation that produced this error is worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Station(_) => true,
            #[cfg(feature = "station-client")]
            Error::Client(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Result type alias using weatherdash-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts() {
        let err: Error = ParseError::InvalidTimeLabel("x".to_string()).into();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("HH:MM:SS"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::Station("offline".to_string()).is_transient());
        assert!(!Error::InvalidConfig("bad".to_string()).is_transient());
        assert!(!Error::InvalidReading("nan".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfig("buffer capacity must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: buffer capacity must be at least 1"
        );
    }
}
