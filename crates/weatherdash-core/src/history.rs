//! Station history filtering and timestamp reconstruction.
//!
//! The station reports history as `HH:MM:SS` labels with no date. Range
//! filters compare those labels as strings, which orders correctly because
//! every label is zero-padded.
//!
//! # Example
//!
//! ```
//! use weatherdash_core::HistoryFilter;
//! use weatherdash_types::HistoryEntry;
//!
//! let entry = |time: &str| HistoryEntry { time: time.into(), temp: 21.0, hum: 45.0, light: 300.0 };
//! let history = vec![entry("08:00:00"), entry("09:00:00"), entry("10:00:00")];
//!
//! let filter = HistoryFilter::new().start("08:30:00").end("10:00:00");
//! let kept = filter.apply(&history);
//! assert_eq!(kept.len(), 2);
//! assert_eq!(kept[0].time, "09:00:00");
//! ```

use time::{Date, UtcOffset};
use tracing::debug;

use weatherdash_types::{HistoryEntry, ParseResult, Reading, TimedHistoryEntry, parse_time_label};

/// Filter applied to station history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Earliest label kept (inclusive).
    pub start: Option<String>,
    /// Latest label kept (inclusive).
    pub end: Option<String>,
    /// Keep only the most recent N entries after range filtering.
    pub limit: Option<usize>,
}

impl HistoryFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start(mut self, label: impl Into<String>) -> Self {
        self.start = Some(label.into());
        self
    }

    #[must_use]
    pub fn end(mut self, label: impl Into<String>) -> Self {
        self.end = Some(label.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the filter keeps everything.
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.limit.is_none()
    }

    /// Check that the range bounds are well-formed `HH:MM:SS` labels.
    pub fn validate(&self) -> ParseResult<()> {
        for label in [&self.start, &self.end].into_iter().flatten() {
            parse_time_label(label)?;
        }
        Ok(())
    }

    /// Whether a single label falls inside the range.
    pub fn contains(&self, label: &str) -> bool {
        let after_start = self.start.as_deref().is_none_or(|start| label >= start);
        let before_end = self.end.as_deref().is_none_or(|end| label <= end);
        after_start && before_end
    }

    /// Apply the filter, preserving order.
    pub fn apply(&self, entries: &[HistoryEntry]) -> Vec<HistoryEntry> {
        let mut kept: Vec<HistoryEntry> = entries
            .iter()
            .filter(|entry| self.contains(&entry.time))
            .cloned()
            .collect();

        if let Some(limit) = self.limit
            && kept.len() > limit
        {
            kept.drain(..kept.len() - limit);
        }

        debug!(
            total = entries.len(),
            kept = kept.len(),
            "Filtered station history"
        );
        kept
    }
}

/// Attach reconstructed timestamps to every entry.
///
/// Fails on the first entry whose label does not parse.
pub fn with_timestamps(
    entries: &[HistoryEntry],
    date: Date,
    offset: UtcOffset,
) -> ParseResult<Vec<TimedHistoryEntry>> {
    entries
        .iter()
        .map(|entry| entry.with_timestamp(date, offset))
        .collect()
}

/// Convert station history into readings ready for analysis.
pub fn to_readings(
    entries: &[HistoryEntry],
    date: Date,
    offset: UtcOffset,
) -> ParseResult<Vec<Reading>> {
    entries
        .iter()
        .map(|entry| Reading::from_history(entry, date, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, offset};

    fn entry(time: &str) -> HistoryEntry {
        HistoryEntry {
            time: time.to_string(),
            temp: 21.0,
            hum: 45.0,
            light: 300.0,
        }
    }

    fn history() -> Vec<HistoryEntry> {
        ["07:59:59", "08:00:00", "12:30:00", "18:00:00", "18:00:01"]
            .into_iter()
            .map(entry)
            .collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = HistoryFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&history()), history());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = HistoryFilter::new().start("08:00:00").end("18:00:00");
        let kept: Vec<String> = filter.apply(&history()).into_iter().map(|e| e.time).collect();
        assert_eq!(kept, vec!["08:00:00", "12:30:00", "18:00:00"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        assert_eq!(HistoryFilter::new().start("12:30:00").apply(&history()).len(), 3);
        assert_eq!(HistoryFilter::new().end("08:00:00").apply(&history()).len(), 2);
    }

    #[test]
    fn test_limit_keeps_most_recent() {
        let kept = HistoryFilter::new().limit(2).apply(&history());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].time, "18:00:00");
        assert_eq!(kept[1].time, "18:00:01");

        assert_eq!(HistoryFilter::new().limit(0).apply(&history()).len(), 0);
        assert_eq!(HistoryFilter::new().limit(99).apply(&history()).len(), 5);
    }

    #[test]
    fn test_limit_applies_after_range() {
        let kept = HistoryFilter::new().end("12:30:00").limit(1).apply(&history());
        assert_eq!(kept, vec![entry("12:30:00")]);
    }

    #[test]
    fn test_validate_rejects_bad_labels() {
        assert!(HistoryFilter::new().start("08:00:00").validate().is_ok());
        assert!(HistoryFilter::new().start("8:00").validate().is_err());
        assert!(HistoryFilter::new().end("25:00:00").validate().is_err());
    }

    #[test]
    fn test_with_timestamps() {
        let timed = with_timestamps(&history()[..2], date!(2024 - 05 - 20), offset!(+2)).unwrap();
        assert_eq!(timed.len(), 2);
        assert_eq!(timed[1].timestamp.date(), date!(2024 - 05 - 20));
        assert_eq!(timed[1].timestamp.hour(), 8);
        assert_eq!(timed[1].timestamp.offset(), offset!(+2));
    }

    #[test]
    fn test_bad_label_fails_conversion() {
        let entries = vec![entry("08:00:00"), entry("ab:cd:ef")];
        assert!(to_readings(&entries, date!(2024 - 05 - 20), offset!(UTC)).is_err());
        assert!(with_timestamps(&entries, date!(2024 - 05 - 20), offset!(UTC)).is_err());
    }

    #[test]
    fn test_to_readings_preserves_values() {
        let readings = to_readings(&history(), date!(2024 - 05 - 20), offset!(UTC)).unwrap();
        assert_eq!(readings.len(), 5);
        assert_eq!(readings[2].time, "12:30:00");
        assert_eq!(readings[2].temperature, 21.0);
        assert_eq!(readings[2].light, 300.0);
    }
}
