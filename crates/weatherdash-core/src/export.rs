//! CSV export of station history.
//!
//! ```
//! use weatherdash_core::export::to_csv;
//! use weatherdash_types::HistoryEntry;
//!
//! let rows = vec![HistoryEntry { time: "12:00:00".into(), temp: 21.26, hum: 40.0, light: 512.0 }];
//! assert_eq!(
//!     to_csv(&rows, true),
//!     "Time,Temperature (°C),Humidity (%),Light\n12:00:00,21.3,40.0,512"
//! );
//! ```

use weatherdash_types::HistoryEntry;

/// Header row of an export.
pub const CSV_HEADER: &str = "Time,Temperature (°C),Humidity (%),Light";

/// Suggested download file name.
pub const EXPORT_FILENAME: &str = "weather-data.csv";

/// MIME type of an export.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Escape a field for CSV output.
///
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One export row, without a line terminator.
///
/// Temperature and humidity get one decimal; light is written as reported.
#[must_use]
pub fn csv_row(entry: &HistoryEntry) -> String {
    format!(
        "{},{:.1},{:.1},{}",
        csv_escape(&entry.time),
        entry.temp,
        entry.hum,
        entry.light
    )
}

/// Render entries as CSV, newline separated with no trailing newline.
///
/// Pass `include_header = false` when appending to an existing file.
#[must_use]
pub fn to_csv(entries: &[HistoryEntry], include_header: bool) -> String {
    let header = include_header.then_some(CSV_HEADER.to_string());
    header
        .into_iter()
        .chain(entries.iter().map(csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Content-Disposition` value for an attachment download.
#[must_use]
pub fn content_disposition(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}
