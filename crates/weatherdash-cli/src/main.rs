use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod format;
mod util;

use cli::{Cli, Commands};
use commands::{AnalyzeArgs, HistoryArgs, WatchArgs};
use format::FormatOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "weatherdash", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let output = cli.output.as_ref();
    let base_opts = FormatOptions::new(cli.no_color || output.is_some(), cli.compact);

    match cli.command {
        Commands::Read {
            station,
            format,
            no_header,
        } => {
            let opts = base_opts.with_no_header(no_header);
            commands::cmd_read(&station, format, output, &opts).await?;
        }
        Commands::History {
            station,
            range,
            format,
            no_header,
        } => {
            let opts = base_opts.with_no_header(no_header);
            commands::cmd_history(HistoryArgs {
                station: &station,
                range: &range,
                format,
                output,
                quiet: cli.quiet,
                opts: &opts,
            })
            .await?;
        }
        Commands::Analyze {
            station,
            range,
            watch_buffer,
            interval,
            format,
        } => {
            commands::cmd_analyze(AnalyzeArgs {
                station: &station,
                range: &range,
                watch_buffer,
                interval,
                format,
                output,
                quiet: cli.quiet,
                opts: &base_opts,
            })
            .await?;
        }
        Commands::Export {
            station,
            range,
            no_header,
        } => {
            commands::cmd_export(&station, &range, no_header, output).await?;
        }
        Commands::Watch {
            station,
            interval,
            count,
            window,
            format,
        } => {
            commands::cmd_watch(WatchArgs {
                station: &station,
                interval,
                count,
                window,
                format,
                output,
                opts: &base_opts,
            })
            .await?;
        }
        Commands::Completions { .. } => {
            // Already handled above
        }
    }

    Ok(())
}
