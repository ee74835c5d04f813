//! Light variability pattern.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::stats::{mean, population_std_dev};

/// Fewer samples than this are always reported as consistent.
pub const MIN_PATTERN_SAMPLES: usize = 10;

/// Coefficient of variation below which light is consistent.
pub const CONSISTENT_CV: f64 = 0.2;

/// Coefficient of variation above which light is variable.
pub const VARIABLE_CV: f64 = 0.5;

/// How much the light level moves around its mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightPattern {
    #[default]
    Consistent,
    Variable,
    /// Moderate variability between the consistent and variable bands, or a
    /// series whose mean is zero.
    Cyclic,
}

impl fmt::Display for LightPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightPattern::Consistent => write!(f, "consistent"),
            LightPattern::Variable => write!(f, "variable"),
            LightPattern::Cyclic => write!(f, "cyclic"),
        }
    }
}

/// `std_dev / mean` of a series, or `None` when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let avg = mean(values);
    if avg == 0.0 {
        return None;
    }
    Some(population_std_dev(values) / avg)
}

/// Classify a light series by its coefficient of variation.
///
/// A long enough series that is dark throughout has no defined coefficient
/// and falls through to [`LightPattern::Cyclic`].
pub fn light_pattern(values: &[f64]) -> LightPattern {
    if values.len() < MIN_PATTERN_SAMPLES {
        return LightPattern::Consistent;
    }

    match coefficient_of_variation(values) {
        None => LightPattern::Cyclic,
        Some(cv) if cv < CONSISTENT_CV => LightPattern::Consistent,
        Some(cv) if cv > VARIABLE_CV => LightPattern::Variable,
        Some(_) => LightPattern::Cyclic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_series_is_consistent() {
        assert_eq!(light_pattern(&[]), LightPattern::Consistent);
        assert_eq!(
            light_pattern(&[0.0, 1000.0, 0.0, 1000.0, 0.0, 1000.0, 0.0, 1000.0, 0.0]),
            LightPattern::Consistent
        );
    }

    #[test]
    fn test_flat_series_is_consistent() {
        assert_eq!(light_pattern(&[500.0; 12]), LightPattern::Consistent);
    }

    #[test]
    fn test_alternating_series_is_variable() {
        // mean 500, std dev 500, cv 1.0
        let values: Vec<f64> = (0..10)
            .map(|i| if i % 2 == 0 { 0.0 } else { 1000.0 })
            .collect();
        assert_eq!(light_pattern(&values), LightPattern::Variable);
    }

    #[test]
    fn test_moderate_variation_is_cyclic() {
        // mean 500, std dev 150, cv 0.3
        let values: Vec<f64> = (0..10)
            .map(|i| if i % 2 == 0 { 350.0 } else { 650.0 })
            .collect();
        assert!((coefficient_of_variation(&values).unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(light_pattern(&values), LightPattern::Cyclic);
    }

    #[test]
    fn test_all_dark_is_cyclic() {
        assert_eq!(coefficient_of_variation(&[0.0; 12]), None);
        assert_eq!(light_pattern(&[0.0; 12]), LightPattern::Cyclic);
        assert_eq!(light_pattern(&[0.0; 10]), LightPattern::Cyclic);
    }

    #[test]
    fn test_short_dark_series_is_consistent() {
        assert_eq!(light_pattern(&[0.0; 9]), LightPattern::Consistent);
    }

    #[test]
    fn test_pattern_serialization() {
        assert_eq!(
            serde_json::to_string(&LightPattern::Cyclic).unwrap(),
            "\"cyclic\""
        );
    }
}
