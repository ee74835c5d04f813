//! History command implementation.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{OutputFormat, RangeArgs, StationArgs};
use crate::format::{FormatOptions, format_history_csv, format_history_json, format_history_text};
use crate::util::{connect, fetch_history, write_output};

/// Arguments for the history command.
pub struct HistoryArgs<'a> {
    pub station: &'a StationArgs,
    pub range: &'a RangeArgs,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_history(args: HistoryArgs<'_>) -> Result<()> {
    let HistoryArgs {
        station,
        range,
        format,
        output,
        quiet,
        opts,
    } = args;

    let client = connect(station)?;
    let history = fetch_history(&client, range).await?;

    if !quiet && matches!(format, OutputFormat::Text) {
        eprintln!("Fetched {} records.", history.len());
    }

    let content = match format {
        OutputFormat::Json => format_history_json(&history, opts)?,
        OutputFormat::Text => format_history_text(&history, opts),
        OutputFormat::Csv => format_history_csv(&history, opts),
    };

    write_output(output, &content)?;
    Ok(())
}
