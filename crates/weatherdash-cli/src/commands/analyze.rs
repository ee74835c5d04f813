//! Analyze command implementation.
//!
//! By default the station's recorded history is analyzed. With
//! `--watch-buffer N` the command instead polls N fresh samples into a
//! rolling buffer and analyzes that, the same way the service does.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;

use weatherdash_core::history::to_readings;
use weatherdash_core::{PollInterval, Reading, ReadingValidator, RollingBuffer, analyze};

use crate::cli::{OutputFormat, RangeArgs, StationArgs};
use crate::format::{FormatOptions, format_analysis_json, format_analysis_text};
use crate::util::{connect, fetch_history, poll_reading, today, write_output};

/// Arguments for the analyze command.
pub struct AnalyzeArgs<'a> {
    pub station: &'a StationArgs,
    pub range: &'a RangeArgs,
    pub watch_buffer: Option<usize>,
    pub interval: PollInterval,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_analyze(args: AnalyzeArgs<'_>) -> Result<()> {
    let AnalyzeArgs {
        station,
        range,
        watch_buffer,
        interval,
        format,
        output,
        quiet,
        opts,
    } = args;

    if format == OutputFormat::Csv {
        bail!("CSV output is not supported for analyze; use --format text or json");
    }

    let client = connect(station)?;

    let readings = match watch_buffer {
        Some(samples) => {
            let mut buffer = RollingBuffer::<Reading>::with_capacity(samples)
                .context("--watch-buffer must be at least 1")?;
            if !quiet {
                eprintln!(
                    "Collecting {} samples every {} from {}...",
                    samples,
                    interval,
                    client.base_url()
                );
            }

            let validator = ReadingValidator::default();
            let mut attempts = 0usize;
            while !buffer.is_full() {
                if attempts > 0 {
                    tokio::time::sleep(interval.as_duration()).await;
                }
                attempts += 1;
                if let Some(reading) = poll_reading(&client, &validator).await? {
                    debug!(time = %reading.time, "Buffered sample");
                    buffer.push(reading);
                }
                // Give up if the station keeps sending garbage
                if attempts >= samples.saturating_mul(2) && !buffer.is_full() {
                    bail!(
                        "Only {} of {} samples were valid after {} polls",
                        buffer.len(),
                        samples,
                        attempts
                    );
                }
            }
            buffer.readings()
        }
        None => {
            let history = fetch_history(&client, range).await?;
            let (date, offset) = today();
            to_readings(&history, date, offset)
                .context("Station history has a malformed time label")?
        }
    };

    let snapshot = analyze(&readings);
    let content = match format {
        OutputFormat::Json => format_analysis_json(&snapshot, opts)?,
        _ => format_analysis_text(&snapshot, readings.len(), opts),
    };

    write_output(output, &content)?;
    Ok(())
}
