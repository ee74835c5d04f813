//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use weatherdash_core::export::{CSV_HEADER, csv_row};
use weatherdash_core::{
    AlertKind, AnalysisSnapshot, CurrentSample, HistoryEntry, OverallRating, Reading, Trend,
};

/// Rows shown in a text history table before it is truncated.
const MAX_TEXT_ROWS: usize = 20;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool, compact: bool) -> Self {
        Self {
            no_color,
            no_header: false,
            compact,
        }
    }

    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }

    fn paint(&self, text: String, color: Color) -> String {
        if self.no_color {
            return text;
        }
        match color {
            Color::Good => text.green().to_string(),
            Color::Warn => text.yellow().to_string(),
            Color::Bad => text.red().to_string(),
            Color::Accent => text.cyan().to_string(),
            Color::Muted => text.dimmed().to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.bold().to_string()
        }
    }
}

#[derive(Clone, Copy)]
enum Color {
    Good,
    Warn,
    Bad,
    Accent,
    Muted,
}

fn rating_color(rating: OverallRating) -> Color {
    match rating {
        OverallRating::Excellent | OverallRating::Good => Color::Good,
        OverallRating::Fair => Color::Warn,
        OverallRating::Poor => Color::Bad,
    }
}

fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Warning => Color::Warn,
        AlertKind::Info => Color::Accent,
        AlertKind::Success => Color::Good,
    }
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Rising => "^",
        Trend::Falling => "v",
        Trend::Stable => "=",
    }
}

// ============================================================================
// Current sample
// ============================================================================

#[must_use]
pub fn format_sample_text(sample: &CurrentSample, opts: &FormatOptions) -> String {
    format!(
        "{:<12} {}\n{:<12} {}\n{:<12} {}\n",
        "Temperature:",
        opts.paint(format!("{:.1}°C", sample.temp), Color::Accent),
        "Humidity:",
        opts.paint(format!("{:.1}%", sample.hum), Color::Accent),
        "Light:",
        opts.paint(format!("{}", sample.light), Color::Accent),
    )
}

#[must_use]
pub fn format_sample_csv(sample: &CurrentSample, opts: &FormatOptions) -> String {
    let mut output = if opts.no_header {
        String::new()
    } else {
        "temp,hum,light\n".to_string()
    };
    output.push_str(&format!(
        "{:.1},{:.1},{}\n",
        sample.temp, sample.hum, sample.light
    ));
    output
}

pub fn format_sample_json(sample: &CurrentSample, opts: &FormatOptions) -> Result<String> {
    opts.as_json(sample)
}

// ============================================================================
// History
// ============================================================================

#[must_use]
pub fn format_history_text(history: &[HistoryEntry], opts: &FormatOptions) -> String {
    if history.is_empty() {
        return "No history records found.\n".to_string();
    }

    let mut output = format!("History ({} records):\n\n", history.len());

    let mut builder = Builder::default();
    builder.push_record(["Time", "Temp (C)", "Humidity", "Light"]);

    // Most recent rows are the interesting ones
    let skipped = history.len().saturating_sub(MAX_TEXT_ROWS);
    for entry in &history[skipped..] {
        builder.push_record([
            entry.time.clone(),
            format!("{:.1}", entry.temp),
            format!("{:.1}%", entry.hum),
            format!("{}", entry.light),
        ]);
    }

    let mut table = builder.build();
    if opts.no_color {
        table.with(Style::ascii());
    } else {
        table.with(Style::rounded());
    }
    output.push_str(&table.to_string());
    output.push('\n');

    if skipped > 0 {
        output.push_str(&format!("... and {} earlier records\n", skipped));
        output.push_str("(Use --format csv or --format json for full data)\n");
    }
    output
}

/// History as CSV, always newline-terminated for terminal output.
#[must_use]
pub fn format_history_csv(history: &[HistoryEntry], opts: &FormatOptions) -> String {
    let mut output = weatherdash_core::export::to_csv(history, !opts.no_header);
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

pub fn format_history_json(history: &[HistoryEntry], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&history)
}

// ============================================================================
// Analysis
// ============================================================================

pub fn format_analysis_json(snapshot: &AnalysisSnapshot, opts: &FormatOptions) -> Result<String> {
    opts.as_json(snapshot)
}

#[must_use]
pub fn format_analysis_text(
    snapshot: &AnalysisSnapshot,
    samples: usize,
    opts: &FormatOptions,
) -> String {
    let mut output = format!(
        "{} ({} samples)\n\n",
        opts.heading("Environment analysis"),
        samples
    );

    let mut builder = Builder::default();
    builder.push_record(["", "Current", "Min", "Max", "Avg", "Trend", "Condition"]);
    let t = &snapshot.temperature;
    builder.push_record([
        "Temperature".to_string(),
        format!("{:.1}°C", t.current),
        format!("{:.1}", t.min),
        format!("{:.1}", t.max),
        format!("{:.1}", t.avg),
        format!("{} {}", trend_arrow(t.trend), t.trend),
        t.classification.to_string(),
    ]);
    let h = &snapshot.humidity;
    builder.push_record([
        "Humidity".to_string(),
        format!("{:.1}%", h.current),
        format!("{:.1}", h.min),
        format!("{:.1}", h.max),
        format!("{:.1}", h.avg),
        format!("{} {}", trend_arrow(h.trend), h.trend),
        h.classification.to_string(),
    ]);
    let l = &snapshot.light;
    builder.push_record([
        "Light".to_string(),
        format!("{:.0}", l.current),
        format!("{:.0}", l.min),
        format!("{:.0}", l.max),
        format!("{:.0}", l.avg),
        format!("{} {}", trend_arrow(l.trend), l.trend),
        l.classification.to_string(),
    ]);
    let mut table = builder.build();
    if opts.no_color {
        table.with(Style::ascii());
    } else {
        table.with(Style::rounded());
    }
    output.push_str(&table.to_string());
    output.push_str("\n\n");

    let conditions = &snapshot.conditions;
    output.push_str(&format!(
        "Comfort index: {} ({})\n",
        opts.paint(
            conditions.comfort_index.to_string(),
            rating_color(conditions.overall)
        ),
        conditions.overall
    ));
    let patterns = &snapshot.patterns;
    output.push_str(&format!(
        "Daily range:   {:.1}°C - {:.1}°C\n",
        patterns.daily_low_temp, patterns.daily_peak_temp
    ));
    output.push_str(&format!(
        "Humidity spread: {:.2}  Light pattern: {}\n",
        patterns.humidity_variance, patterns.light_pattern
    ));

    if !conditions.recommendations.is_empty() {
        output.push_str(&format!("\n{}\n", opts.heading("Recommendations")));
        for recommendation in &conditions.recommendations {
            output.push_str(&format!("  - {}\n", recommendation));
        }
    }

    if !conditions.alerts.is_empty() {
        output.push_str(&format!("\n{}\n", opts.heading("Alerts")));
        for alert in &conditions.alerts {
            let label = opts.paint(format!("[{}]", alert.kind), alert_color(alert.kind));
            output.push_str(&format!("  {} {}\n", label, alert.message));
        }
    }

    output
}

// ============================================================================
// Watch
// ============================================================================

/// One reading followed by a one-line summary of the rolling window.
#[must_use]
pub fn format_watch_line(
    reading: &Reading,
    snapshot: &AnalysisSnapshot,
    opts: &FormatOptions,
) -> String {
    let conditions = &snapshot.conditions;
    let comfort = opts.paint(
        format!("comfort {} {}", conditions.comfort_index, conditions.overall),
        rating_color(conditions.overall),
    );
    let mut line = format!(
        "{}  {:.1}°C {}  {:.1}% {}  {} {}  | {}",
        reading.time,
        reading.temperature,
        trend_arrow(snapshot.temperature.trend),
        reading.humidity,
        trend_arrow(snapshot.humidity.trend),
        reading.light,
        trend_arrow(snapshot.light.trend),
        comfort,
    );

    let warnings = conditions
        .alerts
        .iter()
        .filter(|a| a.kind == AlertKind::Warning)
        .count();
    if warnings > 0 {
        line.push_str(&format!(
            "  {}",
            opts.paint(format!("{} warning(s)", warnings), Color::Warn)
        ));
    } else {
        line.push_str(&format!(
            "  {}",
            opts.paint(snapshot.patterns.light_pattern.to_string(), Color::Muted)
        ));
    }
    line.push('\n');
    line
}

#[must_use]
pub fn format_watch_csv_header() -> String {
    format!("{},comfort_index,overall\n", CSV_HEADER)
}

#[must_use]
pub fn format_watch_csv_line(reading: &Reading, snapshot: &AnalysisSnapshot) -> String {
    format!(
        "{},{},{}\n",
        csv_row(&reading.to_history_entry()),
        snapshot.conditions.comfort_index,
        snapshot.conditions.overall
    )
}

/// One JSON object per line, suitable for streaming.
pub fn format_watch_json(reading: &Reading, snapshot: &AnalysisSnapshot) -> Result<String> {
    let value = serde_json::json!({
        "reading": reading,
        "analysis": snapshot,
    });
    Ok(serde_json::to_string(&value)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use weatherdash_core::analyze;

    fn plain() -> FormatOptions {
        FormatOptions::new(true, false)
    }

    fn entry(time: &str, temp: f64) -> HistoryEntry {
        HistoryEntry {
            time: time.to_string(),
            temp,
            hum: 45.0,
            light: 300.0,
        }
    }

    fn sample_readings() -> Vec<Reading> {
        vec![
            Reading::new(datetime!(2024-05-20 12:00:00 UTC), 21.0, 48.0, 350.0),
            Reading::new(datetime!(2024-05-20 12:00:01 UTC), 22.0, 48.0, 350.0),
            Reading::new(datetime!(2024-05-20 12:00:02 UTC), 23.0, 48.0, 350.0),
        ]
    }

    #[test]
    fn test_sample_text() {
        let sample = CurrentSample {
            temp: 22.46,
            hum: 51.0,
            light: 420.0,
        };
        let text = format_sample_text(&sample, &plain());
        assert!(text.contains("Temperature: 22.5°C"));
        assert!(text.contains("Humidity:    51.0%"));
        assert!(text.contains("Light:       420"));
    }

    #[test]
    fn test_sample_csv() {
        let sample = CurrentSample {
            temp: 22.0,
            hum: 51.04,
            light: 420.0,
        };
        assert_eq!(
            format_sample_csv(&sample, &plain()),
            "temp,hum,light\n22.0,51.0,420\n"
        );
        assert_eq!(
            format_sample_csv(&sample, &plain().with_no_header(true)),
            "22.0,51.0,420\n"
        );
    }

    #[test]
    fn test_sample_json_compact() {
        let sample = CurrentSample {
            temp: 22.0,
            hum: 50.0,
            light: 400.0,
        };
        let json = format_sample_json(&sample, &FormatOptions::new(true, true)).unwrap();
        assert_eq!(json, "{\"temp\":22.0,\"hum\":50.0,\"light\":400.0}\n");
    }

    #[test]
    fn test_history_text_empty() {
        assert_eq!(
            format_history_text(&[], &plain()),
            "No history records found.\n"
        );
    }

    #[test]
    fn test_history_text_truncates_oldest() {
        let history: Vec<_> = (0..25)
            .map(|i| entry(&format!("10:00:{:02}", i), 20.0))
            .collect();
        let text = format_history_text(&history, &plain());
        assert!(text.starts_with("History (25 records):"));
        assert!(!text.contains("10:00:04"));
        assert!(text.contains("10:00:05"));
        assert!(text.contains("10:00:24"));
        assert!(text.contains("... and 5 earlier records"));
    }

    #[test]
    fn test_history_csv() {
        let history = vec![entry("10:00:00", 21.04), entry("10:00:01", 21.5)];
        assert_eq!(
            format_history_csv(&history, &plain()),
            "Time,Temperature (°C),Humidity (%),Light\n10:00:00,21.0,45.0,300\n10:00:01,21.5,45.0,300\n"
        );
        assert_eq!(
            format_history_csv(&history, &plain().with_no_header(true)),
            "10:00:00,21.0,45.0,300\n10:00:01,21.5,45.0,300\n"
        );
        assert_eq!(format_history_csv(&[], &plain().with_no_header(true)), "");
    }

    #[test]
    fn test_analysis_text() {
        let snapshot = analyze(&sample_readings());
        let text = format_analysis_text(&snapshot, 3, &plain());
        assert!(text.contains("Environment analysis (3 samples)"));
        assert!(text.contains("^ rising"));
        assert!(text.contains("Comfort index: 100 (Excellent)"));
        assert!(text.contains("Light pattern: consistent"));
        assert!(text.contains("[success] All environmental parameters are within normal ranges"));
    }

    #[test]
    fn test_analysis_text_empty() {
        let text = format_analysis_text(&AnalysisSnapshot::default(), 0, &plain());
        assert!(text.contains("Comfort index: 75 (Good)"));
        assert!(!text.contains("Recommendations"));
        assert!(!text.contains("Alerts"));
    }

    #[test]
    fn test_watch_line() {
        let readings = sample_readings();
        let snapshot = analyze(&readings);
        let line = format_watch_line(&readings[2], &snapshot, &plain());
        assert!(line.starts_with("12:00:02  23.0°C ^  48.0% =  350 ="));
        assert!(line.contains("comfort 100 Excellent"));
        assert!(line.ends_with("consistent\n"));
    }

    #[test]
    fn test_watch_csv() {
        let readings = sample_readings();
        let snapshot = analyze(&readings);
        assert_eq!(
            format_watch_csv_header(),
            "Time,Temperature (°C),Humidity (%),Light,comfort_index,overall\n"
        );
        assert_eq!(
            format_watch_csv_line(&readings[2], &snapshot),
            "12:00:02,23.0,48.0,350,100,Excellent\n"
        );
    }

    #[test]
    fn test_watch_json_is_single_line() {
        let readings = sample_readings();
        let snapshot = analyze(&readings);
        let json = format_watch_json(&readings[2], &snapshot).unwrap();
        assert_eq!(json.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["reading"]["temperature"], 23.0);
        assert_eq!(value["analysis"]["conditions"]["comfort_index"], 100);
    }
}
