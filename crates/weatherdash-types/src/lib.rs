//! Platform-agnostic types for weather-station readings.
//!
//! This crate provides shared types used by the analytics engine
//! (weatherdash-core), the proxy service and the CLI.
//!
//! # Features
//!
//! - Reading and wire record types (`/data`, `/history` shapes)
//! - `HH:MM:SS` time-label parsing and timestamp reconstruction
//! - Error types for data parsing
//!
//! # Example
//!
//! ```
//! use time::macros::{date, offset};
//! use weatherdash_types::{HistoryEntry, Reading};
//!
//! let entry = HistoryEntry { time: "08:30:00".into(), temp: 21.5, hum: 48.0, light: 420.0 };
//! let reading = Reading::from_history(&entry, date!(2024 - 06 - 01), offset!(UTC)).unwrap();
//! assert_eq!(reading.timestamp.hour(), 8);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    Channel, CurrentSample, HistoryEntry, Reading, TimedHistoryEntry, format_time_label,
    parse_time_label,
};
