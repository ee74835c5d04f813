//! Command-line interface for weather-station dashboards.
//!
//! The `weatherdash` binary talks to a station's HTTP endpoints directly
//! and runs the same analytics engine the dashboard service uses.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `read` | Print the station's latest sample |
//! | `history` | Print the station's recorded history |
//! | `analyze` | Analyze history, or a freshly collected buffer |
//! | `export` | Write history as CSV |
//! | `watch` | Poll continuously and analyze a rolling window |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): Human-readable colored output
//! - **JSON**: Machine-readable JSON format
//! - **CSV**: Comma-separated values for spreadsheets
//!
//! # Environment Variables
//!
//! - `WEATHERDASH_STATION`: Station base URL (overridden by `--station`)
//! - `NO_COLOR`: Disable colored output when set
//!
//! # Examples
//!
//! Analyze today's history between 08:00 and noon:
//! ```bash
//! weatherdash analyze --since 08:00:00 --until 12:00:00
//! ```
//!
//! Analyze 60 fresh samples taken every half second:
//! ```bash
//! weatherdash analyze --watch-buffer 60 --interval 500 --format json
//! ```
//!
//! Export history to a file:
//! ```bash
//! weatherdash export --output weather-data.csv
//! ```

// The binary's modules live in main.rs; the library only re-exports the
// crates it is built on.
pub use weatherdash_core;
pub use weatherdash_types;
