//! Threshold tables for per-channel comfort and condition labels.
//!
//! Each table is an ordered list of `(exclusive upper bound, label)` bands
//! evaluated first-match-wins, plus a label for everything above the last
//! band. A value sitting exactly on a bound falls into the higher band.
//!
//! ```
//! use weatherdash_core::analysis::classify::{TEMPERATURE_COMFORT, TemperatureComfort};
//!
//! assert_eq!(TEMPERATURE_COMFORT.classify(15.9), TemperatureComfort::Cold);
//! assert_eq!(TEMPERATURE_COMFORT.classify(16.0), TemperatureComfort::Cool);
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

/// An ordered band table mapping a value to a label.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<L: 'static> {
    bands: &'static [(f64, L)],
    above: L,
}

impl<L: Copy> ThresholdTable<L> {
    /// Build a table from bands sorted by ascending upper bound.
    pub const fn new(bands: &'static [(f64, L)], above: L) -> Self {
        Self { bands, above }
    }

    /// Label for `value`: the first band whose upper bound exceeds it.
    pub fn classify(&self, value: f64) -> L {
        self.bands
            .iter()
            .find(|(upper, _)| value < *upper)
            .map_or(self.above, |(_, label)| *label)
    }

    /// The bands of this table, lowest first.
    pub fn bands(&self) -> &'static [(f64, L)] {
        self.bands
    }

    /// Label used at or above the highest bound.
    pub fn above(&self) -> L {
        self.above
    }
}

/// Thermal comfort of the current temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureComfort {
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
}

/// Comfort of the current relative humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityComfort {
    Dry,
    Comfortable,
    Humid,
    VeryHumid,
}

/// Lighting condition of the current light level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightCondition {
    Dark,
    Dim,
    Moderate,
    Bright,
    VeryBright,
}

/// Temperature (°C): `<16` cold, `<20` cool, `<26` comfortable, `<30` warm, else hot.
pub const TEMPERATURE_COMFORT: ThresholdTable<TemperatureComfort> = ThresholdTable::new(
    &[
        (16.0, TemperatureComfort::Cold),
        (20.0, TemperatureComfort::Cool),
        (26.0, TemperatureComfort::Comfortable),
        (30.0, TemperatureComfort::Warm),
    ],
    TemperatureComfort::Hot,
);

/// Humidity (%): `<30` dry, `<60` comfortable, `<80` humid, else very humid.
pub const HUMIDITY_COMFORT: ThresholdTable<HumidityComfort> = ThresholdTable::new(
    &[
        (30.0, HumidityComfort::Dry),
        (60.0, HumidityComfort::Comfortable),
        (80.0, HumidityComfort::Humid),
    ],
    HumidityComfort::VeryHumid,
);

/// Light: `<100` dark, `<300` dim, `<600` moderate, `<800` bright, else very bright.
pub const LIGHT_CONDITION: ThresholdTable<LightCondition> = ThresholdTable::new(
    &[
        (100.0, LightCondition::Dark),
        (300.0, LightCondition::Dim),
        (600.0, LightCondition::Moderate),
        (800.0, LightCondition::Bright),
    ],
    LightCondition::VeryBright,
);

pub fn temperature_comfort(celsius: f64) -> TemperatureComfort {
    TEMPERATURE_COMFORT.classify(celsius)
}

pub fn humidity_comfort(percent: f64) -> HumidityComfort {
    HUMIDITY_COMFORT.classify(percent)
}

pub fn light_condition(level: f64) -> LightCondition {
    LIGHT_CONDITION.classify(level)
}

impl fmt::Display for TemperatureComfort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureComfort::Cold => write!(f, "Cold"),
            TemperatureComfort::Cool => write!(f, "Cool"),
            TemperatureComfort::Comfortable => write!(f, "Comfortable"),
            TemperatureComfort::Warm => write!(f, "Warm"),
            TemperatureComfort::Hot => write!(f, "Hot"),
        }
    }
}

impl fmt::Display for HumidityComfort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumidityComfort::Dry => write!(f, "Dry"),
            HumidityComfort::Comfortable => write!(f, "Comfortable"),
            HumidityComfort::Humid => write!(f, "Humid"),
            HumidityComfort::VeryHumid => write!(f, "Very humid"),
        }
    }
}

impl fmt::Display for LightCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightCondition::Dark => write!(f, "Dark"),
            LightCondition::Dim => write!(f, "Dim"),
            LightCondition::Moderate => write!(f, "Moderate"),
            LightCondition::Bright => write!(f, "Bright"),
            LightCondition::VeryBright => write!(f, "Very bright"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_bands() {
        assert_eq!(temperature_comfort(-5.0), TemperatureComfort::Cold);
        assert_eq!(temperature_comfort(18.0), TemperatureComfort::Cool);
        assert_eq!(temperature_comfort(22.0), TemperatureComfort::Comfortable);
        assert_eq!(temperature_comfort(28.0), TemperatureComfort::Warm);
        assert_eq!(temperature_comfort(35.0), TemperatureComfort::Hot);
    }

    #[test]
    fn test_temperature_boundaries_go_up() {
        assert_eq!(temperature_comfort(16.0), TemperatureComfort::Cool);
        assert_eq!(temperature_comfort(20.0), TemperatureComfort::Comfortable);
        assert_eq!(temperature_comfort(25.99), TemperatureComfort::Comfortable);
        assert_eq!(temperature_comfort(26.0), TemperatureComfort::Warm);
        assert_eq!(temperature_comfort(26.01), TemperatureComfort::Warm);
        assert_eq!(temperature_comfort(30.0), TemperatureComfort::Hot);
    }

    #[test]
    fn test_humidity_bands() {
        assert_eq!(humidity_comfort(0.0), HumidityComfort::Dry);
        assert_eq!(humidity_comfort(29.9), HumidityComfort::Dry);
        assert_eq!(humidity_comfort(30.0), HumidityComfort::Comfortable);
        assert_eq!(humidity_comfort(60.0), HumidityComfort::Humid);
        assert_eq!(humidity_comfort(79.9), HumidityComfort::Humid);
        assert_eq!(humidity_comfort(80.0), HumidityComfort::VeryHumid);
        assert_eq!(humidity_comfort(100.0), HumidityComfort::VeryHumid);
    }

    #[test]
    fn test_light_bands() {
        assert_eq!(light_condition(0.0), LightCondition::Dark);
        assert_eq!(light_condition(100.0), LightCondition::Dim);
        assert_eq!(light_condition(299.0), LightCondition::Dim);
        assert_eq!(light_condition(300.0), LightCondition::Moderate);
        assert_eq!(light_condition(600.0), LightCondition::Bright);
        assert_eq!(light_condition(800.0), LightCondition::VeryBright);
        assert_eq!(light_condition(1023.0), LightCondition::VeryBright);
    }

    #[test]
    fn test_every_bound_belongs_to_next_band() {
        let bands = TEMPERATURE_COMFORT.bands();
        for (i, (upper, _)) in bands.iter().enumerate() {
            let expected = bands
                .get(i + 1)
                .map_or(TEMPERATURE_COMFORT.above(), |(_, label)| *label);
            assert_eq!(TEMPERATURE_COMFORT.classify(*upper), expected);
        }
    }

    #[test]
    fn test_bands_are_sorted() {
        for window in LIGHT_CONDITION.bands().windows(2) {
            assert!(window[0].0 < window[1].0);
        }
        for window in HUMIDITY_COMFORT.bands().windows(2) {
            assert!(window[0].0 < window[1].0);
        }
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(
            serde_json::to_string(&HumidityComfort::VeryHumid).unwrap(),
            "\"very_humid\""
        );
        assert_eq!(
            serde_json::to_string(&LightCondition::VeryBright).unwrap(),
            "\"very_bright\""
        );
        assert_eq!(
            serde_json::to_string(&TemperatureComfort::Comfortable).unwrap(),
            "\"comfortable\""
        );
    }
}
