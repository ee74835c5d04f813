//! Per-channel summary statistics.

use weatherdash_types::{Channel, Reading};

/// Current, extrema, mean and last change of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelStats {
    /// Most recent value.
    pub current: f64,
    /// Minimum over the whole sequence.
    pub min: f64,
    /// Maximum over the whole sequence.
    pub max: f64,
    /// Arithmetic mean over the whole sequence.
    pub avg: f64,
    /// `current - previous`, or 0 with fewer than two values.
    pub change_rate: f64,
}

impl ChannelStats {
    /// Compute statistics for an ordered (oldest first) series.
    ///
    /// An empty series yields all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        let Some(&current) = values.last() else {
            return Self::default();
        };

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let change_rate = match values {
            [.., previous, last] => last - previous,
            _ => 0.0,
        };

        Self {
            current,
            min,
            max,
            avg: mean(values),
            change_rate,
        }
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Pull one channel out of a reading sequence, preserving order.
pub fn channel_values(readings: &[Reading], channel: Channel) -> Vec<f64> {
    readings.iter().map(|r| channel.value(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_is_zero() {
        assert_eq!(ChannelStats::from_values(&[]), ChannelStats::default());
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
    }

    #[test]
    fn test_single_value() {
        let stats = ChannelStats::from_values(&[21.5]);
        assert_eq!(stats.current, 21.5);
        assert_eq!(stats.min, 21.5);
        assert_eq!(stats.max, 21.5);
        assert_eq!(stats.avg, 21.5);
        assert_eq!(stats.change_rate, 0.0);
    }

    #[test]
    fn test_full_series() {
        let stats = ChannelStats::from_values(&[20.0, 24.0, 18.0, 22.0]);
        assert_eq!(stats.current, 22.0);
        assert_eq!(stats.min, 18.0);
        assert_eq!(stats.max, 24.0);
        assert_eq!(stats.avg, 21.0);
        assert_eq!(stats.change_rate, 4.0);
    }

    #[test]
    fn test_negative_change_rate() {
        let stats = ChannelStats::from_values(&[55.0, 50.0]);
        assert_eq!(stats.change_rate, -5.0);
    }

    #[test]
    fn test_population_std_dev() {
        // Classic example: population stddev of this set is exactly 2.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(population_std_dev(&[3.0, 3.0, 3.0]), 0.0);
    }
}
