//! Command implementations for the CLI.

mod analyze;
mod export;
mod history;
mod read;
mod watch;

pub use analyze::{AnalyzeArgs, cmd_analyze};
pub use export::cmd_export;
pub use history::{HistoryArgs, cmd_history};
pub use read::cmd_read;
pub use watch::{WatchArgs, cmd_watch};
