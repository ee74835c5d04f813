//! Mock station implementation for testing.
//!
//! [`MockStation`] implements [`WeatherStation`] entirely in memory so the
//! collector, API handlers and CLI commands can be exercised without a
//! station on the network.
//!
//! # Features
//!
//! - **Scripted samples**: queue samples that are served in order before
//!   falling back to the fixed current sample
//! - **Failure injection**: fail every call, or only the next `n`
//! - **Latency simulation**: delay each call to mimic a slow station

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use weatherdash_types::{CurrentSample, HistoryEntry};

use crate::error::{Error, Result};
use crate::traits::WeatherStation;

const MOCK_ENDPOINT: &str = "mock://station";

/// An in-memory weather station.
///
/// # Example
///
/// ```
/// use weatherdash_core::{MockStation, WeatherStation};
///
/// #[tokio::main]
/// async fn main() {
///     let station = MockStation::builder().temperature(27.5).build();
///     let sample = station.current().await.unwrap();
///     assert_eq!(sample.temp, 27.5);
/// }
/// ```
pub struct MockStation {
    endpoint: String,
    current: RwLock<CurrentSample>,
    queued: RwLock<VecDeque<CurrentSample>>,
    history: RwLock<Vec<HistoryEntry>>,
    read_count: AtomicU32,
    should_fail: AtomicBool,
    fail_message: RwLock<String>,
    /// Simulated latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    /// Calls left to fail before succeeding again.
    remaining_failures: AtomicU32,
}

impl std::fmt::Debug for MockStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStation")
            .field("endpoint", &self.endpoint)
            .field("read_count", &self.read_count.load(Ordering::Relaxed))
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for MockStation {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStation {
    /// Create a station reporting comfortable indoor conditions.
    pub fn new() -> Self {
        Self::with_sample(Self::default_sample())
    }

    pub fn builder() -> MockStationBuilder {
        MockStationBuilder::new()
    }

    fn with_sample(sample: CurrentSample) -> Self {
        Self {
            endpoint: MOCK_ENDPOINT.to_string(),
            current: RwLock::new(sample),
            queued: RwLock::new(VecDeque::new()),
            history: RwLock::new(Vec::new()),
            read_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            latency_ms: AtomicU64::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }

    fn default_sample() -> CurrentSample {
        CurrentSample {
            temp: 22.5,
            hum: 50.0,
            light: 400.0,
        }
    }

    async fn check_should_fail(&self) -> Result<()> {
        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::Station(self.fail_message.read().await.clone()));
        }

        if self.should_fail.load(Ordering::Relaxed) {
            Err(Error::Station(self.fail_message.read().await.clone()))
        } else {
            Ok(())
        }
    }

    // --- Test control methods ---

    /// Replace the fixed current sample.
    pub async fn set_sample(&self, sample: CurrentSample) {
        *self.current.write().await = sample;
    }

    pub async fn set_temperature(&self, temp: f64) {
        self.current.write().await.temp = temp;
    }

    pub async fn set_humidity(&self, hum: f64) {
        self.current.write().await.hum = hum;
    }

    pub async fn set_light(&self, light: f64) {
        self.current.write().await.light = light;
    }

    /// Queue samples served one per call before the fixed sample.
    pub async fn queue_samples(&self, samples: impl IntoIterator<Item = CurrentSample>) {
        self.queued.write().await.extend(samples);
    }

    /// Number of queued samples not yet served.
    pub async fn queued_len(&self) -> usize {
        self.queued.read().await.len()
    }

    pub async fn add_history(&self, entries: Vec<HistoryEntry>) {
        self.history.write().await.extend(entries);
    }

    pub async fn set_history(&self, entries: Vec<HistoryEntry>) {
        *self.history.write().await = entries;
    }

    /// Make every call fail until cleared.
    pub async fn set_should_fail(&self, fail: bool, message: Option<&str>) {
        self.should_fail.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    /// Fail the next `count` calls, then succeed.
    pub fn set_transient_failures(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    pub fn remaining_failures(&self) -> u32 {
        self.remaining_failures.load(Ordering::Relaxed)
    }

    /// Delay every call by `latency`. `Duration::ZERO` disables it.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of successful `current()` calls.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    pub fn reset_read_count(&self) {
        self.read_count.store(0, Ordering::Relaxed);
    }
}

#[async_trait]
impl WeatherStation for MockStation {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn current(&self) -> Result<CurrentSample> {
        self.check_should_fail().await?;
        self.read_count.fetch_add(1, Ordering::Relaxed);

        if let Some(sample) = self.queued.write().await.pop_front() {
            *self.current.write().await = sample;
            return Ok(sample);
        }
        Ok(*self.current.read().await)
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.check_should_fail().await?;
        Ok(self.history.read().await.clone())
    }

    async fn is_reachable(&self) -> bool {
        !self.should_fail.load(Ordering::Relaxed)
    }
}

/// Builder for mock stations with custom values.
#[derive(Debug, Clone)]
pub struct MockStationBuilder {
    endpoint: String,
    sample: CurrentSample,
    history: Vec<HistoryEntry>,
    should_fail: bool,
}

impl Default for MockStationBuilder {
    fn default() -> Self {
        Self {
            endpoint: MOCK_ENDPOINT.to_string(),
            sample: MockStation::default_sample(),
            history: Vec::new(),
            should_fail: false,
        }
    }
}

impl MockStationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.sample.temp = temp;
        self
    }

    pub fn humidity(mut self, hum: f64) -> Self {
        self.sample.hum = hum;
        self
    }

    pub fn light(mut self, light: f64) -> Self {
        self.sample.light = light;
        self
    }

    pub fn history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    /// Start out failing every call.
    pub fn failing(mut self, fail: bool) -> Self {
        self.should_fail = fail;
        self
    }

    pub fn build(self) -> MockStation {
        let mut station = MockStation::with_sample(self.sample);
        station.endpoint = self.endpoint;
        station.history = RwLock::new(self.history);
        station.should_fail = AtomicBool::new(self.should_fail);
        station
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: &str, temp: f64) -> HistoryEntry {
        HistoryEntry {
            time: time.to_string(),
            temp,
            hum: 50.0,
            light: 300.0,
        }
    }

    #[tokio::test]
    async fn test_default_sample() {
        let station = MockStation::new();
        let sample = station.current().await.unwrap();
        assert_eq!(sample.temp, 22.5);
        assert_eq!(sample.hum, 50.0);
        assert_eq!(station.read_count(), 1);
        assert_eq!(station.endpoint(), "mock://station");
    }

    #[tokio::test]
    async fn test_builder() {
        let station = MockStation::builder()
            .endpoint("mock://garden")
            .temperature(30.0)
            .humidity(70.0)
            .light(900.0)
            .history(vec![entry("10:00:00", 20.0)])
            .build();

        let sample = station.current().await.unwrap();
        assert_eq!(sample, CurrentSample { temp: 30.0, hum: 70.0, light: 900.0 });
        assert_eq!(station.history().await.unwrap().len(), 1);
        assert_eq!(station.endpoint(), "mock://garden");
    }

    #[tokio::test]
    async fn test_queued_samples_then_last_one_sticks() {
        let station = MockStation::new();
        station
            .queue_samples([
                CurrentSample { temp: 20.0, hum: 40.0, light: 100.0 },
                CurrentSample { temp: 21.0, hum: 41.0, light: 110.0 },
            ])
            .await;
        assert_eq!(station.queued_len().await, 2);

        assert_eq!(station.current().await.unwrap().temp, 20.0);
        assert_eq!(station.current().await.unwrap().temp, 21.0);
        assert_eq!(station.current().await.unwrap().temp, 21.0);
        assert_eq!(station.queued_len().await, 0);
    }

    #[tokio::test]
    async fn test_should_fail() {
        let station = MockStation::new();
        station.set_should_fail(true, Some("offline")).await;

        let err = station.current().await.unwrap_err();
        assert!(matches!(err, Error::Station(ref msg) if msg == "offline"));
        assert!(station.history().await.is_err());
        assert!(!station.is_reachable().await);

        station.set_should_fail(false, None).await;
        assert!(station.current().await.is_ok());
        assert!(station.is_reachable().await);
    }

    #[tokio::test]
    async fn test_transient_failures() {
        let station = MockStation::new();
        station.set_transient_failures(2);

        assert!(station.current().await.is_err());
        assert!(station.current().await.is_err());
        assert_eq!(station.remaining_failures(), 0);
        assert!(station.current().await.is_ok());
        assert_eq!(station.read_count(), 1);
    }

    #[tokio::test]
    async fn test_setters() {
        let station = MockStation::new();
        station.set_temperature(35.0).await;
        station.set_humidity(90.0).await;
        station.set_light(10.0).await;
        let sample = station.current().await.unwrap();
        assert_eq!(sample, CurrentSample { temp: 35.0, hum: 90.0, light: 10.0 });

        station.set_history(vec![entry("09:00:00", 19.0)]).await;
        station.add_history(vec![entry("09:00:01", 19.5)]).await;
        assert_eq!(station.history().await.unwrap().len(), 2);

        station.reset_read_count();
        assert_eq!(station.read_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency() {
        let station = MockStation::new();
        station.set_latency(Duration::from_millis(200));

        let start = tokio::time::Instant::now();
        station.current().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let station: std::sync::Arc<dyn WeatherStation> =
            std::sync::Arc::new(MockStation::new());
        assert!(station.is_reachable().await);
        assert!(station.current().await.is_ok());
    }
}
