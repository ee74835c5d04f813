//! HTTP client for a weather station's REST API.
//!
//! The station exposes `GET /data` (latest sample) and `GET /history`
//! (recent samples with `HH:MM:SS` labels). [`StationClient`] wraps both and
//! implements [`WeatherStation`] so the rest of the crate never deals with
//! HTTP directly.
//!
//! # Example
//!
//! ```no_run
//! use weatherdash_core::client::StationClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StationClient::new("http://192.168.1.40:5000")?;
//!
//! let sample = client.fetch_current().await?;
//! println!("{:.1} °C, {:.1} %", sample.temp, sample.hum);
//!
//! let history = client.fetch_history().await?;
//! println!("{} history entries", history.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use weatherdash_types::{CurrentSample, HistoryEntry};

use crate::traits::WeatherStation;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one station.
#[derive(Debug, Clone)]
pub struct StationClient {
    client: Client,
    base_url: String,
}

/// Error type for station client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The station is not reachable.
    #[error("Station not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request or response decoding failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The station answered with a non-success status.
    #[error("Station returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ClientError {
    /// Whether retrying on the next poll may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::NotReachable { .. } => true,
            ClientError::Request(e) => e.is_timeout() || e.is_connect(),
            ClientError::Status { status, .. } => *status >= 500,
            ClientError::InvalidUrl(_) => false,
        }
    }
}

/// Result type for station client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

fn normalize_base_url(base_url: &str) -> ClientResult<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }
    Ok(base_url)
}

impl StationClient {
    /// Create a client with the default 10 s timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The station's base URL (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { client, base_url })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Latest sample from `GET /data`.
    pub async fn fetch_current(&self) -> ClientResult<CurrentSample> {
        self.get(&self.url("/data")).await
    }

    /// Station history from `GET /history`.
    pub async fn fetch_history(&self) -> ClientResult<Vec<HistoryEntry>> {
        self.get(&self.url("/history")).await
    }

    /// Probe the station with `HEAD /data`.
    pub async fn probe(&self) -> bool {
        let url = self.url("/data");
        match self.client.head(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "Station probe failed");
                false
            }
        }
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ClientError::NotReachable {
                    url: url.to_string(),
                    source: e,
                })?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(ClientError::Request)
        } else {
            Err(status_error(status))
        }
    }
}

fn status_error(status: StatusCode) -> ClientError {
    ClientError::Status {
        status: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    }
}

#[async_trait]
impl WeatherStation for StationClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn current(&self) -> crate::Result<CurrentSample> {
        Ok(self.fetch_current().await?)
    }

    async fn history(&self) -> crate::Result<Vec<HistoryEntry>> {
        Ok(self.fetch_history().await?)
    }

    async fn is_reachable(&self) -> bool {
        self.probe().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = StationClient::new("http://localhost:5000");
        assert!(client.is_ok());
        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.endpoint(), "http://localhost:5000");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = StationClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/data"), "http://localhost:5000/data");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = StationClient::new("localhost:5000");
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));

        let result = StationClient::with_client("ftp://station", Client::new());
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_status_error() {
        let err = status_error(StatusCode::BAD_GATEWAY);
        assert!(matches!(err, ClientError::Status { status: 502, .. }));
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Station returned 502: Bad Gateway");

        let err = status_error(StatusCode::NOT_FOUND);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_invalid_url_is_not_transient() {
        assert!(!ClientError::InvalidUrl("x".into()).is_transient());
    }

    #[tokio::test]
    async fn test_unreachable_station() {
        // Port 9 (discard) on localhost is normally closed.
        let client =
            StationClient::with_timeout("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.fetch_current().await.unwrap_err();
        assert!(err.is_transient());
        assert!(!client.probe().await);
        assert!(!client.is_reachable().await);
    }
}
