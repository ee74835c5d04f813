//! Analytics engine and station plumbing for weather-station dashboards.
//!
//! A station reports temperature, humidity and light once per second. This
//! crate turns an ordered window of those readings into an
//! [`AnalysisSnapshot`]: per-channel statistics and trends, comfort labels,
//! a composite comfort index with an overall rating, recommendations,
//! alerts, and a light-variability pattern.
//!
//! # Features
//!
//! - **Analysis**: [`analyze`] is a pure, deterministic function of its input
//! - **Rolling buffer**: keep the most recent readings for live analysis
//! - **Validation**: reject non-finite and out-of-range samples
//! - **Threshold breaches**: configurable per-channel limits with a bounded log
//! - **History**: filter station history and rebuild absolute timestamps
//! - **Export**: CSV rendering of station history
//! - **Station access**: the [`WeatherStation`] trait, a [`MockStation`], and
//!   (with the `station-client` feature) an HTTP [`client::StationClient`]
//!
//! # Quick Start
//!
//! ```
//! use time::macros::datetime;
//! use weatherdash_core::{RollingBuffer, analysis::trend::Trend};
//! use weatherdash_types::Reading;
//!
//! let mut buffer = RollingBuffer::<Reading>::default();
//! buffer.push(Reading::new(datetime!(2024-05-20 12:00:00 UTC), 21.0, 48.0, 350.0));
//! buffer.push(Reading::new(datetime!(2024-05-20 12:00:01 UTC), 22.0, 48.0, 350.0));
//! buffer.push(Reading::new(datetime!(2024-05-20 12:00:02 UTC), 23.0, 48.0, 350.0));
//!
//! let snapshot = buffer.analyze();
//! assert_eq!(snapshot.temperature.trend, Trend::Rising);
//! assert_eq!(snapshot.conditions.comfort_index, 100);
//! ```

pub mod analysis;
pub mod buffer;
#[cfg(feature = "station-client")]
pub mod client;
pub mod error;
pub mod export;
pub mod history;
pub mod mock;
pub mod settings;
pub mod thresholds;
pub mod traits;
pub mod validation;

pub use analysis::advice::{Alert, AlertKind};
pub use analysis::classify::{HumidityComfort, LightCondition, TemperatureComfort};
pub use analysis::patterns::LightPattern;
pub use analysis::scoring::OverallRating;
pub use analysis::trend::Trend;
pub use analysis::{AnalysisSnapshot, ChannelSummary, Conditions, Patterns, analyze};
pub use buffer::{DEFAULT_BUFFER_CAPACITY, RollingBuffer};
pub use error::{Error, Result};
pub use history::HistoryFilter;
pub use mock::{MockStation, MockStationBuilder};
pub use settings::PollInterval;
pub use thresholds::{AlertThresholds, Breach, BreachLog, ThresholdUpdate};
pub use traits::WeatherStation;
pub use validation::{ReadingValidator, ValidationResult, ValidationWarning, ValidatorConfig};

#[cfg(feature = "station-client")]
pub use client::{ClientError, StationClient};

/// Type alias for a shared station handle.
pub type SharedStation = std::sync::Arc<dyn WeatherStation>;

// Re-export from weatherdash-types
pub use weatherdash_types::{Channel, CurrentSample, HistoryEntry, Reading, TimedHistoryEntry};
