//! Configurable alert thresholds and the breach log.
//!
//! Every sample is compared against a per-channel upper threshold. A value
//! strictly above its threshold produces a [`Breach`]; the log keeps only the
//! most recent [`BREACH_LOG_CAPACITY`] of them.
//!
//! # Example
//!
//! ```
//! use weatherdash_core::{AlertThresholds, BreachLog};
//! use weatherdash_types::CurrentSample;
//!
//! let thresholds = AlertThresholds::default();
//! let mut log = BreachLog::new();
//!
//! let sample = CurrentSample { temp: 31.5, hum: 60.0, light: 900.0 };
//! let recorded = log.record(&thresholds, &sample, "14:02:11");
//! assert_eq!(recorded, 2);
//! ```

use serde::{Deserialize, Serialize};

use weatherdash_types::{Channel, CurrentSample};

use crate::buffer::RollingBuffer;
use crate::error::{Error, Result};

/// Number of breaches kept in a [`BreachLog`].
pub const BREACH_LOG_CAPACITY: usize = 50;

/// Upper thresholds per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Temperature threshold (°C).
    pub temp: f64,
    /// Humidity threshold (%).
    pub hum: f64,
    /// Light threshold.
    pub light: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temp: 30.0,
            hum: 80.0,
            light: 800.0,
        }
    }
}

/// A partial threshold change; absent fields keep their value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<f64>,
}

impl ThresholdUpdate {
    pub fn is_empty(&self) -> bool {
        self.temp.is_none() && self.hum.is_none() && self.light.is_none()
    }
}

impl AlertThresholds {
    /// Threshold for one channel.
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temp,
            Channel::Humidity => self.hum,
            Channel::Light => self.light,
        }
    }

    /// Apply a partial update.
    pub fn apply(&mut self, update: &ThresholdUpdate) {
        if let Some(temp) = update.temp {
            self.temp = temp;
        }
        if let Some(hum) = update.hum {
            self.hum = hum;
        }
        if let Some(light) = update.light {
            self.light = light;
        }
    }

    /// Channels whose value is strictly above the threshold, in channel order.
    pub fn exceeded(&self, sample: &CurrentSample) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|channel| sample.value(*channel) > self.get(*channel))
            .collect()
    }

    /// Validate that every threshold is a finite number.
    pub fn validate(&self) -> Result<()> {
        for channel in Channel::ALL {
            let value = self.get(channel);
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "{} threshold must be finite, got {}",
                    channel, value
                )));
            }
        }
        Ok(())
    }
}

/// One threshold breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breach {
    /// The channel that crossed its threshold.
    #[serde(rename = "type")]
    pub channel: Channel,
    pub value: f64,
    /// `HH:MM:SS` label of the offending sample.
    pub time: String,
}

/// The most recent breaches, oldest first.
#[derive(Debug, Clone)]
pub struct BreachLog {
    entries: RollingBuffer<Breach>,
}

impl Default for BreachLog {
    fn default() -> Self {
        Self::new()
    }
}

impl BreachLog {
    pub fn new() -> Self {
        Self::with_capacity(BREACH_LOG_CAPACITY)
    }

    /// A log keeping at most `capacity` breaches (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RollingBuffer::bounded(capacity),
        }
    }

    /// Compare a sample against `thresholds` and log every breach.
    ///
    /// Returns the number of breaches recorded.
    pub fn record(
        &mut self,
        thresholds: &AlertThresholds,
        sample: &CurrentSample,
        time: &str,
    ) -> usize {
        let exceeded = thresholds.exceeded(sample);
        for channel in &exceeded {
            self.entries.push(Breach {
                channel: *channel,
                value: sample.value(*channel),
                time: time.to_string(),
            });
        }
        exceeded.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Breach> {
        self.entries.latest()
    }

    /// Owned copy of the log, oldest first.
    pub fn entries(&self) -> Vec<Breach> {
        self.entries.readings()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
