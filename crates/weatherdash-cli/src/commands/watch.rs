//! Watch command implementation.
//!
//! Polls the station at a fixed interval, keeps the most recent readings in
//! a rolling window and prints each reading with a summary of the window.
//! Failed polls back off exponentially up to [`MAX_BACKOFF_SECS`].

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;

use weatherdash_core::{PollInterval, Reading, ReadingValidator, RollingBuffer};

use crate::cli::{OutputFormat, StationArgs};
use crate::format::{
    FormatOptions, format_watch_csv_header, format_watch_csv_line, format_watch_json,
    format_watch_line,
};
use crate::util::{append_output, connect, poll_reading};

/// Minimum backoff delay after a failed poll
const MIN_BACKOFF_SECS: u64 = 2;
/// Maximum backoff delay after a failed poll
const MAX_BACKOFF_SECS: u64 = 60;

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub station: &'a StationArgs,
    pub interval: PollInterval,
    pub count: u32,
    pub window: usize,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch(args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        station,
        interval,
        count,
        window,
        format,
        output,
        opts,
    } = args;

    let client = connect(station)?;
    let validator = ReadingValidator::default();
    let mut buffer = RollingBuffer::<Reading>::with_capacity(window)?;

    let header = if opts.no_color {
        format!("Watching: {}", client.base_url())
    } else {
        format!("Watching: {}", client.base_url().cyan())
    };
    eprintln!("{}", header);
    if count > 0 {
        eprintln!(
            "Interval: {} | Window: {} | Count: {} | Press Ctrl+C to stop",
            interval, window, count
        );
    } else {
        eprintln!(
            "Interval: {} | Window: {} | Press Ctrl+C to stop",
            interval, window
        );
    }
    eprintln!("{}", "-".repeat(50));

    let mut header_written = opts.no_header;
    let mut readings_taken: u32 = 0;
    let mut backoff_secs = MIN_BACKOFF_SECS;

    loop {
        let delay = match poll_reading(&client, &validator).await {
            Ok(Some(reading)) => {
                backoff_secs = MIN_BACKOFF_SECS;
                readings_taken += 1;
                buffer.push(reading.clone());
                let snapshot = buffer.analyze();

                let content = match format {
                    OutputFormat::Json => format_watch_json(&reading, &snapshot)?,
                    OutputFormat::Csv => {
                        let mut out = String::new();
                        if !header_written {
                            out.push_str(&format_watch_csv_header());
                            header_written = true;
                        }
                        out.push_str(&format_watch_csv_line(&reading, &snapshot));
                        out
                    }
                    OutputFormat::Text => format_watch_line(&reading, &snapshot, opts),
                };
                append_output(output, &content)?;

                if count > 0 && readings_taken >= count {
                    eprintln!("Completed {} readings.", readings_taken);
                    return Ok(());
                }
                interval.as_duration()
            }
            Ok(None) => interval.as_duration(),
            Err(e) => {
                eprintln!("Read failed: {:#}. Retrying in {}s...", e, backoff_secs);
                let delay = Duration::from_secs(backoff_secs);
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                delay
            }
        };

        // Wait for next interval with graceful shutdown support
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                return Ok(());
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
