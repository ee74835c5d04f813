//! Read command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{OutputFormat, StationArgs};
use crate::format::{FormatOptions, format_sample_csv, format_sample_json, format_sample_text};
use crate::util::{connect, write_output};

pub async fn cmd_read(
    station: &StationArgs,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let client = connect(station)?;
    let sample = client
        .fetch_current()
        .await
        .with_context(|| format!("Failed to read current values from {}", client.base_url()))?;

    let content = match format {
        OutputFormat::Json => format_sample_json(&sample, opts)?,
        OutputFormat::Text => format_sample_text(&sample, opts),
        OutputFormat::Csv => format_sample_csv(&sample, opts),
    };

    write_output(output, &content)?;
    Ok(())
}
