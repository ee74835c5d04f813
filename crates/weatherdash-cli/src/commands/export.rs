//! Export command implementation.
//!
//! Writes the same CSV the dashboard's download button produces, to
//! `--output` or stdout.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use weatherdash_core::export::to_csv;

use crate::cli::{RangeArgs, StationArgs};
use crate::util::{connect, fetch_history, write_output};

pub async fn cmd_export(
    station: &StationArgs,
    range: &RangeArgs,
    no_header: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let client = connect(station)?;
    let history = fetch_history(&client, range).await?;

    let mut content = to_csv(&history, !no_header);
    if !content.is_empty() {
        content.push('\n');
    }

    write_output(output, &content)?;
    if let Some(path) = output {
        info!("Exported {} records to {}", history.len(), path.display());
    }
    Ok(())
}
