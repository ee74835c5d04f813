//! Analytics over an ordered sequence of readings.
//!
//! [`analyze`] is a pure function: the same readings always produce the
//! same [`AnalysisSnapshot`], and nothing is cached between calls. Hosts
//! re-run it whenever their buffer changes.
//!
//! # Example
//!
//! ```
//! use time::macros::datetime;
//! use weatherdash_core::analysis::{analyze, scoring::OverallRating};
//! use weatherdash_types::Reading;
//!
//! let readings = vec![
//!     Reading::new(datetime!(2024-05-20 12:00:00 UTC), 24.0, 50.0, 420.0),
//!     Reading::new(datetime!(2024-05-20 12:00:01 UTC), 25.0, 50.0, 430.0),
//! ];
//!
//! let snapshot = analyze(&readings);
//! assert_eq!(snapshot.temperature.current, 25.0);
//! assert_eq!(snapshot.conditions.comfort_index, 100);
//! assert_eq!(snapshot.conditions.overall, OverallRating::Excellent);
//! ```

pub mod advice;
pub mod classify;
pub mod patterns;
pub mod scoring;
pub mod stats;
pub mod trend;

use serde::{Deserialize, Serialize};
use weatherdash_types::{Channel, Reading};

use advice::{Alert, CurrentConditions};
use classify::{HumidityComfort, LightCondition, TemperatureComfort};
use patterns::LightPattern;
use scoring::{DEFAULT_COMFORT_INDEX, OverallRating};
use stats::ChannelStats;
use trend::Trend;

/// Statistics, trend and label for one channel.
///
/// The label is always serialized as `classification`. Browser dashboards
/// built against the older payload read `comfort` for temperature and
/// humidity and `condition` for light, so they need a one-line rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary<C> {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub trend: Trend,
    #[serde(rename = "changeRate")]
    pub change_rate: f64,
    pub classification: C,
}

impl<C> ChannelSummary<C> {
    fn new(stats: ChannelStats, trend: Trend, classification: C) -> Self {
        Self {
            current: stats.current,
            min: stats.min,
            max: stats.max,
            avg: stats.avg,
            trend,
            change_rate: stats.change_rate,
            classification,
        }
    }

    /// An all-zero, stable summary carrying `classification`.
    pub fn empty(classification: C) -> Self {
        Self::new(ChannelStats::default(), Trend::Stable, classification)
    }
}

/// Aggregate comfort rating with its recommendations and alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub overall: OverallRating,
    pub comfort_index: u8,
    pub recommendations: Vec<String>,
    pub alerts: Vec<Alert>,
}

/// Whole-sequence patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patterns {
    pub daily_peak_temp: f64,
    pub daily_low_temp: f64,
    /// Population standard deviation of humidity.
    pub humidity_variance: f64,
    pub light_pattern: LightPattern,
}

/// Everything derived from one reading sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub temperature: ChannelSummary<TemperatureComfort>,
    pub humidity: ChannelSummary<HumidityComfort>,
    pub light: ChannelSummary<LightCondition>,
    pub conditions: Conditions,
    pub patterns: Patterns,
}

impl Default for AnalysisSnapshot {
    /// The snapshot reported for an empty sequence.
    fn default() -> Self {
        Self {
            temperature: ChannelSummary::empty(TemperatureComfort::Comfortable),
            humidity: ChannelSummary::empty(HumidityComfort::Comfortable),
            light: ChannelSummary::empty(LightCondition::Moderate),
            conditions: Conditions {
                overall: OverallRating::Good,
                comfort_index: DEFAULT_COMFORT_INDEX,
                recommendations: Vec::new(),
                alerts: Vec::new(),
            },
            patterns: Patterns {
                daily_peak_temp: 0.0,
                daily_low_temp: 0.0,
                humidity_variance: 0.0,
                light_pattern: LightPattern::Consistent,
            },
        }
    }
}

impl AnalysisSnapshot {
    /// Whether any alert other than the all-clear is present.
    pub fn has_alerts(&self) -> bool {
        self.conditions
            .alerts
            .iter()
            .any(|a| a.kind != advice::AlertKind::Success)
    }
}

/// Analyze an ordered (oldest first) sequence of readings.
///
/// Readings are assumed to carry finite values; see
/// [`crate::validation`] for the checks applied before buffering.
pub fn analyze(readings: &[Reading]) -> AnalysisSnapshot {
    if readings.is_empty() {
        return AnalysisSnapshot::default();
    }

    let temps = stats::channel_values(readings, Channel::Temperature);
    let hums = stats::channel_values(readings, Channel::Humidity);
    let lights = stats::channel_values(readings, Channel::Light);

    let temp_stats = ChannelStats::from_values(&temps);
    let hum_stats = ChannelStats::from_values(&hums);
    let light_stats = ChannelStats::from_values(&lights);

    let current = CurrentConditions {
        temperature: temp_stats.current,
        humidity: hum_stats.current,
        light: light_stats.current,
        temperature_trend: trend::classify(&temps),
        humidity_trend: trend::classify(&hums),
    };

    let comfort_index = scoring::comfort_index(current.temperature, current.humidity);

    AnalysisSnapshot {
        temperature: ChannelSummary::new(
            temp_stats,
            current.temperature_trend,
            classify::temperature_comfort(current.temperature),
        ),
        humidity: ChannelSummary::new(
            hum_stats,
            current.humidity_trend,
            classify::humidity_comfort(current.humidity),
        ),
        light: ChannelSummary::new(
            light_stats,
            trend::classify(&lights),
            classify::light_condition(current.light),
        ),
        conditions: Conditions {
            overall: OverallRating::from_index(comfort_index),
            comfort_index,
            recommendations: advice::recommendations(&current),
            alerts: advice::alerts(&current),
        },
        patterns: Patterns {
            daily_peak_temp: temp_stats.max,
            daily_low_temp: temp_stats.min,
            humidity_variance: stats::population_std_dev(&hums),
            light_pattern: patterns::light_pattern(&lights),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advice::AlertKind;
    use proptest::prelude::*;
    use time::{Duration, macros::datetime};

    fn series(samples: &[(f64, f64, f64)]) -> Vec<Reading> {
        let start = datetime!(2024-05-20 08:00:00 UTC);
        samples
            .iter()
            .enumerate()
            .map(|(i, &(t, h, l))| Reading::new(start + Duration::seconds(i as i64), t, h, l))
            .collect()
    }

    #[test]
    fn test_empty_input_default_snapshot() {
        let snapshot = analyze(&[]);

        assert_eq!(snapshot.temperature.current, 0.0);
        assert_eq!(snapshot.temperature.min, 0.0);
        assert_eq!(snapshot.temperature.max, 0.0);
        assert_eq!(snapshot.temperature.avg, 0.0);
        assert_eq!(snapshot.temperature.change_rate, 0.0);
        assert_eq!(snapshot.temperature.trend, Trend::Stable);
        assert_eq!(
            snapshot.temperature.classification,
            TemperatureComfort::Comfortable
        );
        assert_eq!(
            snapshot.humidity.classification,
            HumidityComfort::Comfortable
        );
        assert_eq!(snapshot.light.classification, LightCondition::Moderate);
        assert_eq!(snapshot.conditions.overall, OverallRating::Good);
        assert_eq!(snapshot.conditions.comfort_index, 75);
        assert!(snapshot.conditions.recommendations.is_empty());
        assert!(snapshot.conditions.alerts.is_empty());
        assert_eq!(snapshot.patterns.daily_peak_temp, 0.0);
        assert_eq!(snapshot.patterns.daily_low_temp, 0.0);
        assert_eq!(snapshot.patterns.humidity_variance, 0.0);
        assert_eq!(snapshot.patterns.light_pattern, LightPattern::Consistent);
    }

    #[test]
    fn test_ideal_conditions() {
        let snapshot = analyze(&series(&[(25.0, 50.0, 400.0)]));
        assert_eq!(snapshot.conditions.comfort_index, 100);
        assert_eq!(snapshot.conditions.overall, OverallRating::Excellent);
        assert_eq!(
            snapshot.conditions.recommendations,
            vec!["Environmental conditions are optimal".to_string()]
        );
    }

    #[test]
    fn test_warm_and_humid() {
        let snapshot = analyze(&series(&[(29.0, 75.0, 400.0)]));
        assert_eq!(snapshot.conditions.comfort_index, 65);
        assert_eq!(snapshot.conditions.overall, OverallRating::Fair);
        assert_eq!(snapshot.temperature.classification, TemperatureComfort::Warm);
        assert_eq!(snapshot.humidity.classification, HumidityComfort::Humid);
        assert_eq!(snapshot.conditions.recommendations.len(), 2);
    }

    #[test]
    fn test_all_clear_alert() {
        let snapshot = analyze(&series(&[
            (22.0, 50.0, 400.0),
            (22.0, 50.0, 400.0),
            (22.0, 50.0, 400.0),
        ]));
        assert_eq!(
            snapshot.conditions.alerts,
            vec![Alert::new(
                AlertKind::Success,
                "All environmental parameters are within normal ranges"
            )]
        );
        assert!(!snapshot.has_alerts());
    }

    #[test]
    fn test_trend_feeds_alerts() {
        // temperature slope = (28 - 26) / 2 = 1.0
        let snapshot = analyze(&series(&[
            (26.0, 50.0, 400.0),
            (27.0, 50.0, 400.0),
            (28.0, 50.0, 400.0),
        ]));
        assert_eq!(snapshot.temperature.trend, Trend::Rising);
        assert_eq!(snapshot.temperature.change_rate, 1.0);
        assert_eq!(snapshot.conditions.alerts.len(), 1);
        assert_eq!(snapshot.conditions.alerts[0].kind, AlertKind::Info);
        assert!(snapshot.has_alerts());
    }

    #[test]
    fn test_stats_and_patterns() {
        let snapshot = analyze(&series(&[
            (18.0, 40.0, 100.0),
            (24.0, 60.0, 300.0),
            (21.0, 50.0, 200.0),
        ]));
        assert_eq!(snapshot.temperature.current, 21.0);
        assert_eq!(snapshot.temperature.min, 18.0);
        assert_eq!(snapshot.temperature.max, 24.0);
        assert_eq!(snapshot.temperature.avg, 21.0);
        assert_eq!(snapshot.temperature.change_rate, -3.0);
        assert_eq!(snapshot.patterns.daily_peak_temp, 24.0);
        assert_eq!(snapshot.patterns.daily_low_temp, 18.0);
        let expected_sd = (200.0_f64 / 3.0).sqrt();
        assert!((snapshot.patterns.humidity_variance - expected_sd).abs() < 1e-9);
        assert_eq!(snapshot.patterns.light_pattern, LightPattern::Consistent);
        assert_eq!(snapshot.light.classification, LightCondition::Dim);
    }

    #[test]
    fn test_short_light_series_is_consistent() {
        let snapshot = analyze(&series(&[
            (22.0, 50.0, 0.0),
            (22.0, 50.0, 1000.0),
            (22.0, 50.0, 0.0),
            (22.0, 50.0, 1000.0),
        ]));
        assert_eq!(snapshot.patterns.light_pattern, LightPattern::Consistent);
    }

    #[test]
    fn test_dark_night_is_cyclic() {
        let snapshot = analyze(&series(&[(18.0, 55.0, 0.0); 12]));
        assert_eq!(snapshot.light.classification, LightCondition::Dark);
        assert_eq!(snapshot.patterns.light_pattern, LightPattern::Cyclic);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = analyze(&series(&[(22.0, 50.0, 400.0)]));
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["temperature"]["classification"], "comfortable");
        assert_eq!(json["temperature"]["trend"], "stable");
        assert!(json["temperature"].get("changeRate").is_some());
        assert_eq!(json["light"]["classification"], "moderate");
        assert_eq!(json["conditions"]["overall"], "excellent");
        assert_eq!(json["conditions"]["comfort_index"], 100);
        assert_eq!(json["conditions"]["alerts"][0]["type"], "success");
        assert_eq!(json["patterns"]["light_pattern"], "consistent");
    }

    proptest! {
        #[test]
        fn analyze_is_deterministic(
            samples in prop::collection::vec(
                (-40.0f64..85.0, 0.0f64..100.0, 0.0f64..1024.0),
                0..60,
            )
        ) {
            let readings = series(&samples);
            prop_assert_eq!(analyze(&readings), analyze(&readings));
        }

        #[test]
        fn comfort_index_matches_rating(
            samples in prop::collection::vec(
                (-40.0f64..85.0, 0.0f64..100.0, 0.0f64..1024.0),
                1..30,
            )
        ) {
            let snapshot = analyze(&series(&samples));
            prop_assert!(snapshot.conditions.comfort_index <= 100);
            prop_assert_eq!(
                snapshot.conditions.overall,
                OverallRating::from_index(snapshot.conditions.comfort_index)
            );
            prop_assert!(!snapshot.conditions.recommendations.is_empty());
            prop_assert!(!snapshot.conditions.alerts.is_empty());
            prop_assert!(snapshot.temperature.min <= snapshot.temperature.max);
        }
    }
}
