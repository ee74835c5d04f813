//! Plausibility checks for station samples.
//!
//! The analytics engine assumes finite, in-range values. The collector runs
//! every sample through a [`ReadingValidator`] first and drops anything
//! marked invalid.
//!
//! # Example
//!
//! ```
//! use weatherdash_core::ReadingValidator;
//! use weatherdash_types::CurrentSample;
//!
//! let validator = ReadingValidator::default();
//!
//! let ok = validator.validate(&CurrentSample { temp: 22.5, hum: 48.0, light: 512.0 });
//! assert!(ok.is_valid);
//! assert!(!ok.has_warnings());
//!
//! let broken = validator.validate(&CurrentSample { temp: f64::NAN, hum: 48.0, light: 512.0 });
//! assert!(!broken.is_valid);
//! ```

use serde::{Deserialize, Serialize};

use weatherdash_types::{Channel, CurrentSample};

/// Problems found while validating a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ValidationWarning {
    /// The channel value is NaN or infinite.
    NotFinite { channel: Channel },
    /// Temperature is below the plausible minimum.
    TemperatureTooLow { value: f64, min: f64 },
    /// Temperature is above the plausible maximum.
    TemperatureTooHigh { value: f64, max: f64 },
    /// Humidity is outside 0-100 %.
    HumidityOutOfRange { value: f64 },
    /// Light intensity is negative.
    NegativeLight { value: f64 },
}

impl ValidationWarning {
    /// Whether this warning makes the sample unusable.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            ValidationWarning::NotFinite { .. }
                | ValidationWarning::HumidityOutOfRange { .. }
                | ValidationWarning::NegativeLight { .. }
        )
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::NotFinite { channel } => {
                write!(f, "{} value is not a finite number", channel)
            }
            ValidationWarning::TemperatureTooLow { value, min } => {
                write!(f, "Temperature {}°C is below minimum {}°C", value, min)
            }
            ValidationWarning::TemperatureTooHigh { value, max } => {
                write!(f, "Temperature {}°C exceeds maximum {}°C", value, max)
            }
            ValidationWarning::HumidityOutOfRange { value } => {
                write!(f, "Humidity {}% is out of valid range (0-100)", value)
            }
            ValidationWarning::NegativeLight { value } => {
                write!(f, "Light level {} is negative", value)
            }
        }
    }
}

/// Result of validating a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the sample may be buffered.
    pub is_valid: bool,
    /// Everything noticed, including non-critical warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            warnings: Vec::new(),
        }
    }

    /// Build a result whose validity follows from the warnings.
    pub fn from_warnings(warnings: Vec<ValidationWarning>) -> Self {
        Self {
            is_valid: !warnings.iter().any(ValidationWarning::is_critical),
            warnings,
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Bounds used by [`ReadingValidator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Minimum plausible temperature (°C).
    pub temperature_min: f64,
    /// Maximum plausible temperature (°C).
    pub temperature_max: f64,
    /// Clamp humidity into 0-100 instead of rejecting it.
    pub clamp_humidity: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            temperature_min: -40.0,
            temperature_max: 85.0,
            clamp_humidity: false,
        }
    }
}

impl ValidatorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature range (min, max).
    #[must_use]
    pub fn temperature_range(mut self, min: f64, max: f64) -> Self {
        self.temperature_min = min;
        self.temperature_max = max;
        self
    }

    /// Set whether out-of-range humidity is clamped.
    #[must_use]
    pub fn clamp_humidity(mut self, clamp: bool) -> Self {
        self.clamp_humidity = clamp;
        self
    }
}

/// Validator for station samples.
#[derive(Debug, Clone, Default)]
pub struct ReadingValidator {
    config: ValidatorConfig,
}

impl ReadingValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a sample as reported.
    pub fn validate(&self, sample: &CurrentSample) -> ValidationResult {
        let mut warnings: Vec<ValidationWarning> = Channel::ALL
            .into_iter()
            .filter(|channel| !sample.value(*channel).is_finite())
            .map(|channel| ValidationWarning::NotFinite { channel })
            .collect();

        // Range checks are meaningless once a value is NaN/inf
        if !warnings.is_empty() {
            return ValidationResult::from_warnings(warnings);
        }

        if sample.temp < self.config.temperature_min {
            warnings.push(ValidationWarning::TemperatureTooLow {
                value: sample.temp,
                min: self.config.temperature_min,
            });
        }
        if sample.temp > self.config.temperature_max {
            warnings.push(ValidationWarning::TemperatureTooHigh {
                value: sample.temp,
                max: self.config.temperature_max,
            });
        }

        if !(0.0..=100.0).contains(&sample.hum) && !self.config.clamp_humidity {
            warnings.push(ValidationWarning::HumidityOutOfRange { value: sample.hum });
        }

        if sample.light < 0.0 {
            warnings.push(ValidationWarning::NegativeLight {
                value: sample.light,
            });
        }

        ValidationResult::from_warnings(warnings)
    }

    /// Apply the configured corrections to a sample.
    ///
    /// Only humidity is ever adjusted, and only when clamping is enabled.
    pub fn sanitize(&self, sample: CurrentSample) -> CurrentSample {
        if self.config.clamp_humidity && sample.hum.is_finite() {
            CurrentSample {
                hum: sample.hum.clamp(0.0, 100.0),
                ..sample
            }
        } else {
            sample
        }
    }

    /// Quick check if a temperature value is within the plausible range.
    pub fn is_temperature_plausible(&self, temp: f64) -> bool {
        temp >= self.config.temperature_min && temp <= self.config.temperature_max
    }
}
