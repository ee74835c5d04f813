//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use weatherdash_core::{DEFAULT_BUFFER_CAPACITY, PollInterval};

/// Default station URL when neither `--station` nor `WEATHERDASH_STATION` is set.
pub const DEFAULT_STATION: &str = "http://127.0.0.1:5000";

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Reusable station connection arguments
#[derive(Debug, Clone, Args)]
pub struct StationArgs {
    /// Station base URL, or use WEATHERDASH_STATION env var
    #[arg(short, long, env = "WEATHERDASH_STATION", default_value = DEFAULT_STATION)]
    pub station: String,

    /// Request timeout in seconds
    #[arg(short = 'T', long, default_value = "10")]
    pub timeout: u64,
}

/// Reusable history range arguments
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// Keep entries at or after this time of day (HH:MM:SS)
    #[arg(long, value_parser = parse_time_label)]
    pub since: Option<String>,

    /// Keep entries at or before this time of day (HH:MM:SS)
    #[arg(long, value_parser = parse_time_label)]
    pub until: Option<String>,

    /// Keep only the most recent N entries (0 for all)
    #[arg(short, long, default_value = "0")]
    pub count: usize,
}

#[derive(Parser)]
#[command(name = "weatherdash")]
#[command(author, version, about = "CLI for weather-station dashboards", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    ///
    /// Any non-empty `NO_COLOR` other than a false-like word (`0`, `false`,
    /// `no`, `off`) also disables color.
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the station's latest sample
    Read {
        #[command(flatten)]
        station: StationArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Omit header row in CSV output (useful for appending)
        #[arg(long)]
        no_header: bool,
    },

    /// Retrieve the station's recent history
    History {
        #[command(flatten)]
        station: StationArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Omit header row in CSV output (useful for appending)
        #[arg(long)]
        no_header: bool,
    },

    /// Analyze station history, or a freshly collected buffer
    Analyze {
        #[command(flatten)]
        station: StationArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Collect this many live samples instead of reading history
        #[arg(long, value_name = "SAMPLES")]
        watch_buffer: Option<usize>,

        /// Polling interval in milliseconds for --watch-buffer (500-10000)
        #[arg(short, long, default_value = "1000", value_parser = parse_interval)]
        interval: PollInterval,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Export station history as CSV
    Export {
        #[command(flatten)]
        station: StationArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Omit header row (useful for appending)
        #[arg(long)]
        no_header: bool,
    },

    /// Continuously poll the station and analyze a rolling window
    Watch {
        #[command(flatten)]
        station: StationArgs,

        /// Polling interval in milliseconds (500-10000)
        #[arg(short, long, default_value = "1000", value_parser = parse_interval)]
        interval: PollInterval,

        /// Number of readings to take before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,

        /// Readings kept in the rolling window
        #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY, value_parser = parse_capacity)]
        window: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Parse a polling interval in milliseconds with range validation
fn parse_interval(s: &str) -> Result<PollInterval, String> {
    let ms: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    PollInterval::from_millis(ms).map_err(|e| e.to_string())
}

/// Parse a non-zero window size
fn parse_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("window must hold at least one reading".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid number", s)),
    }
}

/// Accept only well-formed `HH:MM:SS` labels
fn parse_time_label(s: &str) -> Result<String, String> {
    weatherdash_types::parse_time_label(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}
