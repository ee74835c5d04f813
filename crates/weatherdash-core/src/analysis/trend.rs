//! Short-window trend classification.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of trailing samples handed to the classifier.
pub const TREND_WINDOW: usize = 10;

/// Slopes with an absolute value below this are considered flat.
pub const STABLE_SLOPE: f64 = 0.5;

/// Direction of a channel over its last few samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Increasing by at least [`STABLE_SLOPE`] per sample.
    Rising,
    /// Decreasing by at least [`STABLE_SLOPE`] per sample.
    Falling,
    /// No significant movement, or not enough samples to tell.
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Rising => write!(f, "rising"),
            Trend::Falling => write!(f, "falling"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// The last [`TREND_WINDOW`] values of a series.
pub fn recent_window(values: &[f64]) -> &[f64] {
    &values[values.len().saturating_sub(TREND_WINDOW)..]
}

/// Average per-sample slope across the last three values.
///
/// Only the first and third of those three are used. Returns `None` when
/// fewer than three values are available.
pub fn slope(values: &[f64]) -> Option<f64> {
    match values {
        [.., first, _, last] => Some((last - first) / 2.0),
        _ => None,
    }
}

/// Classify the direction of a series.
///
/// Series shorter than three samples are always [`Trend::Stable`]. A slope of
/// exactly [`STABLE_SLOPE`] already counts as movement.
pub fn classify(values: &[f64]) -> Trend {
    let Some(slope) = slope(recent_window(values)) else {
        return Trend::Stable;
    };

    if slope.abs() < STABLE_SLOPE {
        Trend::Stable
    } else if slope > 0.0 {
        Trend::Rising
    } else {
        Trend::Falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_is_stable() {
        assert_eq!(classify(&[]), Trend::Stable);
        assert_eq!(classify(&[10.0]), Trend::Stable);
        assert_eq!(classify(&[10.0, 40.0]), Trend::Stable);
    }

    #[test]
    fn test_small_slope_is_stable() {
        // slope = 0.2
        assert_eq!(classify(&[20.0, 20.0, 20.4]), Trend::Stable);
    }

    #[test]
    fn test_boundary_slope_is_rising() {
        // slope = 0.5 exactly, which is not < 0.5
        assert_eq!(slope(&[20.0, 20.0, 21.0]), Some(0.5));
        assert_eq!(classify(&[20.0, 20.0, 21.0]), Trend::Rising);
    }

    #[test]
    fn test_falling() {
        assert_eq!(classify(&[30.0, 29.0, 28.0]), Trend::Falling);
        assert_eq!(classify(&[20.0, 20.0, 19.0]), Trend::Falling);
    }

    #[test]
    fn test_middle_value_is_ignored() {
        assert_eq!(classify(&[20.0, 100.0, 20.0]), Trend::Stable);
    }

    #[test]
    fn test_only_last_three_matter() {
        let values = [0.0, 50.0, 100.0, 20.0, 20.0, 20.0];
        assert_eq!(classify(&values), Trend::Stable);
    }

    #[test]
    fn test_recent_window_caps_length() {
        let values: Vec<f64> = (0..25).map(f64::from).collect();
        let window = recent_window(&values);
        assert_eq!(window.len(), TREND_WINDOW);
        assert_eq!(window[0], 15.0);
        assert_eq!(recent_window(&values[..4]).len(), 4);
    }

    #[test]
    fn test_trend_serialization() {
        assert_eq!(serde_json::to_string(&Trend::Rising).unwrap(), "\"rising\"");
        assert_eq!(serde_json::to_string(&Trend::Stable).unwrap(), "\"stable\"");
        assert_eq!(Trend::Falling.to_string(), "falling");
    }
}
