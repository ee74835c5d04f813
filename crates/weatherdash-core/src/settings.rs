//! Polling settings shared by the service and CLI.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How often the station is polled for a live sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PollInterval(u64);

impl PollInterval {
    /// Fastest allowed interval in milliseconds.
    pub const MIN_MS: u64 = 500;
    /// Slowest allowed interval in milliseconds.
    pub const MAX_MS: u64 = 10_000;
    /// Default interval in milliseconds.
    pub const DEFAULT_MS: u64 = 1_000;

    /// Build an interval, rejecting values outside 500-10000 ms.
    pub fn from_millis(ms: u64) -> Result<Self> {
        if (Self::MIN_MS..=Self::MAX_MS).contains(&ms) {
            Ok(Self(ms))
        } else {
            Err(Error::InvalidConfig(format!(
                "poll interval must be between {} and {} ms, got {}",
                Self::MIN_MS,
                Self::MAX_MS,
                ms
            )))
        }
    }

    /// Build an interval, clamping into the allowed range.
    pub fn clamped(ms: u64) -> Self {
        Self(ms.clamp(Self::MIN_MS, Self::MAX_MS))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(Self::DEFAULT_MS)
    }
}

impl TryFrom<u64> for PollInterval {
    type Error = Error;

    fn try_from(ms: u64) -> Result<Self> {
        Self::from_millis(ms)
    }
}

impl From<PollInterval> for u64 {
    fn from(interval: PollInterval) -> Self {
        interval.0
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}s", self.0 / 1000)
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_second() {
        assert_eq!(PollInterval::default().as_millis(), 1000);
        assert_eq!(
            PollInterval::default().as_duration(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_range_limits() {
        assert!(PollInterval::from_millis(500).is_ok());
        assert!(PollInterval::from_millis(10_000).is_ok());
        assert!(PollInterval::from_millis(499).is_err());
        assert!(PollInterval::from_millis(10_001).is_err());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(PollInterval::clamped(10).as_millis(), 500);
        assert_eq!(PollInterval::clamped(60_000).as_millis(), 10_000);
        assert_eq!(PollInterval::clamped(2_500).as_millis(), 2_500);
    }

    #[test]
    fn test_serde_validates() {
        let ok: PollInterval = serde_json::from_str("2000").unwrap();
        assert_eq!(ok.as_millis(), 2000);
        assert!(serde_json::from_str::<PollInterval>("100").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "2000");
    }

    #[test]
    fn test_display() {
        assert_eq!(PollInterval::default().to_string(), "1s");
        assert_eq!(PollInterval::clamped(1500).to_string(), "1500ms");
    }
}
