//! Service configuration.
//!
//! Loaded from `server.toml`; every section and field is optional and falls
//! back to its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use weatherdash_core::settings::PollInterval;
use weatherdash_core::{AlertThresholds, DEFAULT_BUFFER_CAPACITY, ValidatorConfig};

/// Largest accepted rolling buffer.
pub const MAX_BUFFER_CAPACITY: usize = 86_400;

/// Accepted station request timeout range, in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub station: StationConfig,
    /// Breach thresholds applied to every polled sample.
    pub thresholds: AlertThresholds,
    /// Plausibility checks applied before buffering.
    pub validation: ValidatorConfig,
}

impl Config {
    /// Load configuration from the default path, or defaults if absent.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate every section, collecting all problems.
    ///
    /// ```
    /// use weatherdash_service::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = self.server.validate();
        errors.extend(self.station.validate());
        errors.extend(validate_thresholds(&self.thresholds));

        if self.validation.temperature_min >= self.validation.temperature_max {
            errors.push(ValidationError::new(
                "validation.temperature_min",
                "must be lower than validation.temperature_max",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        const FIELD: &str = "server.bind";

        if self.bind.is_empty() {
            return vec![ValidationError::new(FIELD, "bind address cannot be empty")];
        }

        let Some((_, port)) = self.bind.rsplit_once(':') else {
            return vec![ValidationError::new(
                FIELD,
                format!(
                    "invalid bind address '{}': expected format 'host:port'",
                    self.bind
                ),
            )];
        };

        match port.parse::<u16>() {
            Ok(0) => vec![ValidationError::new(FIELD, "port cannot be 0")],
            Ok(_) => Vec::new(),
            Err(_) => vec![ValidationError::new(
                FIELD,
                format!("invalid port '{}': must be a number 1-65535", port),
            )],
        }
    }
}

/// Where the station lives and how it is polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Station base URL.
    pub url: String,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Number of live readings kept for analysis.
    pub buffer_capacity: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: PollInterval::DEFAULT_MS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            timeout_secs: 10,
        }
    }
}

impl StationConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.url.is_empty() {
            errors.push(ValidationError::new("station.url", "station URL cannot be empty"));
        } else if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            errors.push(ValidationError::new(
                "station.url",
                format!("'{}' must start with http:// or https://", self.url),
            ));
        }

        if let Err(e) = PollInterval::from_millis(self.poll_interval_ms) {
            errors.push(ValidationError::new("station.poll_interval_ms", e.to_string()));
        }

        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            errors.push(ValidationError::new(
                "station.buffer_capacity",
                format!(
                    "buffer capacity {} is out of range (1-{})",
                    self.buffer_capacity, MAX_BUFFER_CAPACITY
                ),
            ));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            errors.push(ValidationError::new(
                "station.timeout_secs",
                format!(
                    "timeout {} is out of range ({}-{} seconds)",
                    self.timeout_secs, MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
                ),
            ));
        }

        errors
    }

    /// The validated poll interval, clamped if out of range.
    pub fn poll_interval(&self) -> PollInterval {
        PollInterval::clamped(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

fn validate_thresholds(thresholds: &AlertThresholds) -> Vec<ValidationError> {
    match thresholds.validate() {
        Ok(()) => Vec::new(),
        Err(e) => vec![ValidationError::new("thresholds", e.to_string())],
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted field path, e.g. `station.poll_interval_ms`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weatherdash")
        .join("server.toml")
}
