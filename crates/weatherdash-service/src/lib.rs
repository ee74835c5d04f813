//! Background collector and HTTP REST API for weather-station dashboards.
//!
//! This crate provides a service that:
//! - Polls one station on a fixed interval into a rolling buffer
//! - Validates samples and logs threshold breaches
//! - Proxies the station's `/data` and `/history` endpoints
//! - Serves analysis snapshots over live and historical readings
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /api/status` - Collector, station and buffer status
//! - `GET /api/data` - Latest station sample (502 if the station is down)
//! - `GET /api/history` - Station history, filtered by `start`, `end`, `limit`
//! - `GET /api/analysis-data` - History with reconstructed timestamps
//! - `GET /api/export` - History as a `weather-data.csv` download
//! - `GET /api/readings` - Rolling buffer contents
//! - `GET /api/analysis` - Analysis over the rolling buffer
//! - `GET /api/analysis/history` - Analysis over station history
//! - `GET|PUT /api/thresholds` - Breach thresholds
//! - `GET /api/alerts` - Breach log
//! - `POST /api/collector/start|stop` - Collector control
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/weatherdash/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [station]
//! url = "http://192.168.1.40:5000"
//! poll_interval_ms = 1000
//! buffer_capacity = 300
//! timeout_secs = 10
//!
//! [thresholds]
//! temp = 30.0
//! hum = 80.0
//! light = 800.0
//! ```

pub mod api;
pub mod collector;
pub mod config;
pub mod state;

pub use collector::{Collector, CollectorError};
pub use config::{Config, ConfigError, ServerConfig, StationConfig, ValidationError};
pub use state::{AppState, CollectionStats, local_offset};
