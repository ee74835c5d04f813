//! Core types for weather-station data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};

use crate::error::{ParseError, ParseResult};

/// A sensor channel reported by the station.
///
/// The serialized names match the station's wire keys (`temp`, `hum`, `light`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    /// Air temperature in °C.
    #[cfg_attr(feature = "serde", serde(rename = "temp"))]
    Temperature,
    /// Relative humidity in %.
    #[cfg_attr(feature = "serde", serde(rename = "hum"))]
    Humidity,
    /// Unitless light intensity.
    #[cfg_attr(feature = "serde", serde(rename = "light"))]
    Light,
}

impl Channel {
    /// All channels in display order.
    pub const ALL: [Channel; 3] = [Channel::Temperature, Channel::Humidity, Channel::Light];

    /// The station's wire key for this channel.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Temperature => "temp",
            Channel::Humidity => "hum",
            Channel::Light => "light",
        }
    }

    /// Display unit suffix (empty for light).
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Temperature => "°C",
            Channel::Humidity => "%",
            Channel::Light => "",
        }
    }

    /// Extract this channel's value from a reading.
    #[must_use]
    pub fn value(&self, reading: &Reading) -> f64 {
        match self {
            Channel::Temperature => reading.temperature,
            Channel::Humidity => reading.humidity,
            Channel::Light => reading.light,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Temperature => write!(f, "Temperature"),
            Channel::Humidity => write!(f, "Humidity"),
            Channel::Light => write!(f, "Light"),
        }
    }
}

impl FromStr for Channel {
    type Err = ParseError;

    /// Parse a channel from its wire key or its full name (case-insensitive).
    ///
    /// ```
    /// use weatherdash_types::Channel;
    ///
    /// assert_eq!("temp".parse::<Channel>(), Ok(Channel::Temperature));
    /// assert_eq!("Humidity".parse::<Channel>(), Ok(Channel::Humidity));
    /// assert!("pressure".parse::<Channel>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temp" | "temperature" => Ok(Channel::Temperature),
            "hum" | "humidity" => Ok(Channel::Humidity),
            "light" => Ok(Channel::Light),
            _ => Err(ParseError::InvalidData(format!("unknown channel '{}'", s))),
        }
    }
}

/// Parse an `HH:MM:SS` wall-clock label.
///
/// Hours, minutes and seconds must each be two digits.
///
/// ```
/// use weatherdash_types::parse_time_label;
///
/// let t = parse_time_label("14:05:09").unwrap();
/// assert_eq!((t.hour(), t.minute(), t.second()), (14, 5, 9));
/// assert!(parse_time_label("24:00:00").is_err());
/// assert!(parse_time_label("14:05").is_err());
/// ```
pub fn parse_time_label(label: &str) -> ParseResult<Time> {
    Time::parse(label, format_description!("[hour]:[minute]:[second]"))
        .map_err(|_| ParseError::InvalidTimeLabel(label.to_string()))
}

/// Format a time of day as an `HH:MM:SS` label.
#[must_use]
pub fn format_time_label(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// One sensor sample.
///
/// `time` is the wall-clock label the station reports; `timestamp` is the
/// absolute instant reconstructed from it. Readings are never mutated once
/// built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Wall-clock label, `HH:MM:SS`.
    pub time: String,
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
    /// Light intensity (unitless, non-negative).
    pub light: f64,
    /// Absolute capture instant.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
}

impl Reading {
    /// Build a reading captured at `timestamp`; the time label is derived from it.
    #[must_use]
    pub fn new(timestamp: OffsetDateTime, temperature: f64, humidity: f64, light: f64) -> Self {
        Self {
            time: format_time_label(timestamp.time()),
            temperature,
            humidity,
            light,
            timestamp,
        }
    }

    /// Stamp a live sample from the station with its capture instant.
    #[must_use]
    pub fn from_sample(sample: &CurrentSample, captured_at: OffsetDateTime) -> Self {
        Self::new(captured_at, sample.temp, sample.hum, sample.light)
    }

    /// Rebuild a reading from a history entry.
    ///
    /// The station only records a time of day, so the calendar date and
    /// offset have to be supplied by the caller (normally "today" in the
    /// local offset).
    pub fn from_history(entry: &HistoryEntry, date: Date, offset: UtcOffset) -> ParseResult<Self> {
        let timestamp = entry.timestamp_on(date, offset)?;
        Ok(Self {
            time: entry.time.clone(),
            temperature: entry.temp,
            humidity: entry.hum,
            light: entry.light,
            timestamp,
        })
    }

    /// Convert back into the station's history wire shape.
    #[must_use]
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            time: self.time.clone(),
            temp: self.temperature,
            hum: self.humidity,
            light: self.light,
        }
    }
}

/// Latest sample as served by the station's `/data` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentSample {
    /// Temperature in °C.
    pub temp: f64,
    /// Relative humidity in %.
    pub hum: f64,
    /// Light intensity.
    pub light: f64,
}

impl CurrentSample {
    /// Value of a single channel.
    #[must_use]
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temp,
            Channel::Humidity => self.hum,
            Channel::Light => self.light,
        }
    }
}

/// One record from the station's `/history` endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryEntry {
    /// Wall-clock label, `HH:MM:SS`.
    pub time: String,
    /// Temperature in °C.
    pub temp: f64,
    /// Relative humidity in %.
    pub hum: f64,
    /// Light intensity.
    pub light: f64,
}

impl HistoryEntry {
    /// Parse the entry's time label.
    pub fn time_of_day(&self) -> ParseResult<Time> {
        parse_time_label(&self.time)
    }

    /// Combine the entry's time of day with a calendar date.
    pub fn timestamp_on(&self, date: Date, offset: UtcOffset) -> ParseResult<OffsetDateTime> {
        let time = self.time_of_day()?;
        Ok(date.with_time(time).assume_offset(offset))
    }

    /// Attach a reconstructed absolute timestamp.
    pub fn with_timestamp(&self, date: Date, offset: UtcOffset) -> ParseResult<TimedHistoryEntry> {
        Ok(TimedHistoryEntry {
            entry: self.clone(),
            timestamp: self.timestamp_on(date, offset)?,
        })
    }
}

/// A history entry enriched with its reconstructed timestamp.
///
/// Serializes flat: `{time, temp, hum, light, timestamp}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimedHistoryEntry {
    /// The original station record.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub entry: HistoryEntry,
    /// Absolute instant for the record.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
}

impl From<&TimedHistoryEntry> for Reading {
    fn from(timed: &TimedHistoryEntry) -> Self {
        Self {
            time: timed.entry.time.clone(),
            temperature: timed.entry.temp,
            humidity: timed.entry.hum,
            light: timed.entry.light,
            timestamp: timed.timestamp,
        }
    }
}
