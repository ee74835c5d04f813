//! Composite comfort index and overall rating.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Comfort index reported when there is nothing to analyze.
pub const DEFAULT_COMFORT_INDEX: u8 = 75;

/// Penalty schedule for one channel: an ideal band nested inside an
/// acceptable band. Leaving the ideal band costs `mild`, leaving the
/// acceptable band costs `severe`. Band edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyBand {
    pub ideal: (f64, f64),
    pub acceptable: (f64, f64),
    pub mild: i32,
    pub severe: i32,
}

impl PenaltyBand {
    /// Penalty for a value under this schedule.
    pub fn penalty(&self, value: f64) -> i32 {
        let outside = |(low, high): (f64, f64)| value < low || value > high;
        if outside(self.acceptable) {
            self.severe
        } else if outside(self.ideal) {
            self.mild
        } else {
            0
        }
    }
}

/// Temperature: ideal 20–26 °C, acceptable 18–28 °C.
pub const TEMPERATURE_PENALTY: PenaltyBand = PenaltyBand {
    ideal: (20.0, 26.0),
    acceptable: (18.0, 28.0),
    mild: 10,
    severe: 20,
};

/// Humidity: ideal 40–60 %, acceptable 30–70 %.
pub const HUMIDITY_PENALTY: PenaltyBand = PenaltyBand {
    ideal: (40.0, 60.0),
    acceptable: (30.0, 70.0),
    mild: 5,
    severe: 15,
};

/// Comfort index in `0..=100` for the current temperature and humidity.
///
/// Penalties for the two channels are independent and additive.
///
/// ```
/// use weatherdash_core::analysis::scoring::comfort_index;
///
/// assert_eq!(comfort_index(25.0, 50.0), 100);
/// assert_eq!(comfort_index(29.0, 75.0), 65);
/// ```
pub fn comfort_index(temperature: f64, humidity: f64) -> u8 {
    let score = 100 - TEMPERATURE_PENALTY.penalty(temperature) - HUMIDITY_PENALTY.penalty(humidity);
    score.clamp(0, 100) as u8
}

/// Overall rating derived from the comfort index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl OverallRating {
    /// `>=85` excellent, `>=70` good, `>=50` fair, otherwise poor.
    pub fn from_index(comfort_index: u8) -> Self {
        match comfort_index {
            85.. => OverallRating::Excellent,
            70..=84 => OverallRating::Good,
            50..=69 => OverallRating::Fair,
            _ => OverallRating::Poor,
        }
    }
}

impl fmt::Display for OverallRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallRating::Excellent => write!(f, "Excellent"),
            OverallRating::Good => write!(f, "Good"),
            OverallRating::Fair => write!(f, "Fair"),
            OverallRating::Poor => write!(f, "Poor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_conditions() {
        assert_eq!(comfort_index(25.0, 50.0), 100);
        assert_eq!(OverallRating::from_index(100), OverallRating::Excellent);
    }

    #[test]
    fn test_both_severe() {
        let index = comfort_index(29.0, 75.0);
        assert_eq!(index, 65);
        assert_eq!(OverallRating::from_index(index), OverallRating::Fair);
    }

    #[test]
    fn test_mild_penalties() {
        assert_eq!(comfort_index(19.0, 50.0), 90);
        assert_eq!(comfort_index(27.0, 50.0), 90);
        assert_eq!(comfort_index(22.0, 35.0), 95);
        assert_eq!(comfort_index(22.0, 65.0), 95);
        assert_eq!(comfort_index(27.0, 65.0), 85);
    }

    #[test]
    fn test_band_edges_are_inside() {
        assert_eq!(TEMPERATURE_PENALTY.penalty(20.0), 0);
        assert_eq!(TEMPERATURE_PENALTY.penalty(26.0), 0);
        assert_eq!(TEMPERATURE_PENALTY.penalty(18.0), 10);
        assert_eq!(TEMPERATURE_PENALTY.penalty(28.0), 10);
        assert_eq!(TEMPERATURE_PENALTY.penalty(28.01), 20);
        assert_eq!(HUMIDITY_PENALTY.penalty(40.0), 0);
        assert_eq!(HUMIDITY_PENALTY.penalty(70.0), 5);
        assert_eq!(HUMIDITY_PENALTY.penalty(29.99), 15);
    }

    #[test]
    fn test_worst_case_stays_in_range() {
        assert_eq!(comfort_index(-30.0, 100.0), 65);
        assert_eq!(OverallRating::from_index(65), OverallRating::Fair);
    }

    #[test]
    fn test_rating_cut_points() {
        assert_eq!(OverallRating::from_index(85), OverallRating::Excellent);
        assert_eq!(OverallRating::from_index(84), OverallRating::Good);
        assert_eq!(OverallRating::from_index(70), OverallRating::Good);
        assert_eq!(OverallRating::from_index(69), OverallRating::Fair);
        assert_eq!(OverallRating::from_index(50), OverallRating::Fair);
        assert_eq!(OverallRating::from_index(49), OverallRating::Poor);
        assert_eq!(OverallRating::from_index(0), OverallRating::Poor);
    }

    #[test]
    fn test_default_index_is_good() {
        assert_eq!(
            OverallRating::from_index(DEFAULT_COMFORT_INDEX),
            OverallRating::Good
        );
    }

    #[test]
    fn test_rating_serialization() {
        assert_eq!(
            serde_json::to_string(&OverallRating::Excellent).unwrap(),
            "\"excellent\""
        );
    }
}
