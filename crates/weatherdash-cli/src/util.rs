//! Utility functions for CLI operations.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::warn;

use weatherdash_core::{HistoryEntry, HistoryFilter, Reading, ReadingValidator, StationClient};

use crate::cli::{RangeArgs, StationArgs};

/// Build an HTTP client for the station named on the command line.
pub fn connect(args: &StationArgs) -> Result<StationClient> {
    StationClient::with_timeout(&args.station, Duration::from_secs(args.timeout))
        .with_context(|| format!("Invalid station URL '{}'", args.station))
}

/// Fetch the station's history and apply the range arguments.
pub async fn fetch_history(client: &StationClient, range: &RangeArgs) -> Result<Vec<HistoryEntry>> {
    let history = client
        .fetch_history()
        .await
        .with_context(|| format!("Failed to fetch history from {}", client.base_url()))?;
    Ok(range_filter(range).apply(&history))
}

/// Fetch one live sample and stamp it with the local capture time.
///
/// Samples the validator rejects are logged and skipped (`Ok(None)`).
pub async fn poll_reading(
    client: &StationClient,
    validator: &ReadingValidator,
) -> Result<Option<Reading>> {
    let sample = client
        .fetch_current()
        .await
        .with_context(|| format!("Failed to read current values from {}", client.base_url()))?;
    let captured_at = now();

    let validation = validator.validate(&sample);
    if !validation.is_valid {
        for warning in validation.warnings.iter().filter(|w| w.is_critical()) {
            warn!("Dropped invalid sample: {}", warning);
        }
        return Ok(None);
    }

    let sample = validator.sanitize(sample);
    Ok(Some(Reading::from_sample(&sample, captured_at)))
}

/// Translate range arguments into a history filter. A count of 0 keeps all.
pub fn range_filter(range: &RangeArgs) -> HistoryFilter {
    HistoryFilter {
        start: range.since.clone(),
        end: range.until.clone(),
        limit: (range.count > 0).then_some(range.count),
    }
}

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Resolve the host's UTC offset, falling back to UTC.
///
/// Must run before the async runtime starts; on Unix the lookup fails once
/// other threads exist. Later calls return the first result.
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// Offset resolved by [`init_local_offset`], or UTC if it never ran.
pub fn local_offset() -> UtcOffset {
    LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC)
}

/// Current time in the local offset.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

/// Calendar date and offset used to anchor station time labels.
pub fn today() -> (Date, UtcOffset) {
    let offset = local_offset();
    (now().date(), offset)
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Append output to file or write it to stdout.
///
/// Used by streaming commands that emit one chunk per reading.
pub fn append_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
