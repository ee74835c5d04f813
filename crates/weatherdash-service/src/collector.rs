//! Background data collector.
//!
//! One tokio task polls the station at the configured interval. Every
//! sample is validated, stamped with its capture time, pushed into the
//! rolling buffer and checked against the breach thresholds.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use weatherdash_core::{PollInterval, Reading, WeatherStation};

use crate::state::AppState;

/// Failures after which polling errors are no longer logged individually.
const LOUD_FAILURES: u32 = 3;

/// Background collector that polls the station.
pub struct Collector {
    state: Arc<AppState>,
}

impl Collector {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Spawn the polling task.
    ///
    /// Returns `false` without doing anything if the collector is already
    /// running.
    pub async fn start(&self) -> bool {
        if !self.state.collector.try_start() {
            return false;
        }

        let poll_interval = self.state.config.read().await.station.poll_interval();

        self.state.collector.reset_stop();
        let stop_rx = self.state.collector.subscribe_stop();

        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            collect(state, poll_interval, stop_rx).await;
        });
        self.state.collector.set_task(handle).await;
        true
    }
}

/// Poll until the stop signal is raised.
async fn collect(
    state: Arc<AppState>,
    poll_interval: PollInterval,
    mut stop_rx: watch::Receiver<bool>,
) {
    info!(
        station = %state.station.endpoint(),
        interval = %poll_interval,
        "Starting collector"
    );

    let mut timer = interval(poll_interval.as_duration());
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_failures = 0u32;

    loop {
        tokio::select! {
            _ = timer.tick() => {}
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
        }

        if *stop_rx.borrow() {
            break;
        }

        match poll_once(&state).await {
            Ok(reading) => {
                if consecutive_failures > LOUD_FAILURES {
                    info!(
                        "Station back online after {} failed polls",
                        consecutive_failures
                    );
                }
                consecutive_failures = 0;
                debug!(
                    time = %reading.time,
                    temperature = reading.temperature,
                    humidity = reading.humidity,
                    light = reading.light,
                    "Collected reading"
                );
            }
            Err(CollectorError::Rejected(reason)) => {
                consecutive_failures = 0;
                warn!("Dropped invalid sample: {}", reason);
            }
            Err(e) => {
                consecutive_failures += 1;
                if consecutive_failures <= LOUD_FAILURES {
                    warn!(
                        "Failed to poll {}: {} (attempt {})",
                        state.station.endpoint(),
                        e,
                        consecutive_failures
                    );
                } else if consecutive_failures == LOUD_FAILURES + 1 {
                    error!(
                        "Failed to poll {} after {} attempts, will continue trying silently",
                        state.station.endpoint(),
                        consecutive_failures
                    );
                }
            }
        }
    }

    info!("Collector stopped");
}

/// Fetch one sample and fold it into the shared state.
///
/// Returns the buffered reading. Rejected samples and station failures are
/// recorded in the collection stats before the error is returned.
pub async fn poll_once(state: &AppState) -> Result<Reading, CollectorError> {
    let sample = match state.station.current().await {
        Ok(sample) => sample,
        Err(e) => {
            state
                .collector
                .stats
                .write()
                .await
                .record_failure(state.now(), e.to_string());
            return Err(CollectorError::Station(e));
        }
    };
    let captured_at = state.now();

    let validation = state.validator.validate(&sample);
    if !validation.is_valid {
        let reason = validation
            .warnings
            .iter()
            .filter(|w| w.is_critical())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        state
            .collector
            .stats
            .write()
            .await
            .record_rejected(captured_at, reason.clone());
        return Err(CollectorError::Rejected(reason));
    }
    for warning in &validation.warnings {
        warn!("Implausible sample kept: {}", warning);
    }

    let sample = state.validator.sanitize(sample);
    let reading = Reading::from_sample(&sample, captured_at);
    let thresholds = *state.thresholds.read().await;

    state.buffer.write().await.push(reading.clone());
    let breaches = state
        .breaches
        .write()
        .await
        .record(&thresholds, &sample, &reading.time);
    if breaches > 0 {
        info!(time = %reading.time, count = breaches, "Threshold breach recorded");
    }

    state.collector.stats.write().await.record_success(captured_at);
    Ok(reading)
}

/// Collector errors.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to read station: {0}")]
    Station(weatherdash_core::Error),
    #[error("Sample rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use weatherdash_core::{Channel, CurrentSample, MockStation};

    use crate::config::Config;

    fn sample(temp: f64, hum: f64, light: f64) -> CurrentSample {
        CurrentSample { temp, hum, light }
    }

    fn create_state(station: Arc<MockStation>) -> Arc<AppState> {
        AppState::new(Config::default(), station)
    }

    #[tokio::test]
    async fn test_poll_once_buffers_reading() {
        let station = Arc::new(MockStation::builder().temperature(24.0).build());
        let state = create_state(Arc::clone(&station));

        let reading = poll_once(&state).await.unwrap();
        assert_eq!(reading.temperature, 24.0);
        assert_eq!(state.buffer.read().await.len(), 1);
        assert!(state.breaches.read().await.is_empty());

        let stats = state.collector.stats.read().await;
        assert_eq!(stats.success_count, 1);
        assert!(stats.station_online);
        assert!(stats.last_poll_at.is_some());
    }

    #[tokio::test]
    async fn test_poll_once_records_breaches() {
        let station = Arc::new(MockStation::new());
        station.set_sample(sample(31.0, 85.0, 100.0)).await;
        let state = create_state(station);

        let reading = poll_once(&state).await.unwrap();
        let breaches = state.breaches.read().await.entries();
        assert_eq!(breaches.len(), 2);
        assert_eq!(breaches[0].channel, Channel::Temperature);
        assert_eq!(breaches[1].channel, Channel::Humidity);
        assert_eq!(breaches[1].value, 85.0);
        assert_eq!(breaches[0].time, reading.time);
    }

    #[tokio::test]
    async fn test_poll_once_rejects_invalid_sample() {
        let station = Arc::new(MockStation::new());
        station.set_sample(sample(22.0, 120.0, 100.0)).await;
        let state = create_state(station);

        let err = poll_once(&state).await.unwrap_err();
        assert!(matches!(err, CollectorError::Rejected(ref msg) if msg.contains("Humidity")));
        assert!(state.buffer.read().await.is_empty());

        let stats = state.collector.stats.read().await;
        assert_eq!(stats.rejected_count, 1);
        assert_eq!(stats.success_count, 0);
    }

    #[tokio::test]
    async fn test_poll_once_clamps_humidity_when_configured() {
        let station = Arc::new(MockStation::new());
        station.set_sample(sample(22.0, 104.0, 100.0)).await;

        let mut config = Config::default();
        config.validation.clamp_humidity = true;
        let state = AppState::new(config, station);

        let reading = poll_once(&state).await.unwrap();
        assert_eq!(reading.humidity, 100.0);
    }

    #[tokio::test]
    async fn test_poll_once_station_failure() {
        let station = Arc::new(MockStation::new());
        station.set_should_fail(true, Some("offline")).await;
        let state = create_state(station);

        let err = poll_once(&state).await.unwrap_err();
        assert!(matches!(err, CollectorError::Station(_)));

        let stats = state.collector.stats.read().await;
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.consecutive_failures, 1);
        assert_eq!(stats.last_error.as_deref(), Some("Station error: offline"));
        assert!(!stats.station_online);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collector_polls_until_stopped() {
        let station = Arc::new(MockStation::new());
        let state = create_state(Arc::clone(&station));
        let collector = Collector::new(Arc::clone(&state));

        assert!(collector.start().await);
        assert!(state.collector.is_running());
        assert!(!collector.start().await);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let polled = station.read_count();
        assert!(polled >= 3, "expected at least 3 polls, got {}", polled);

        state.collector.signal_stop();
        assert!(state.collector.wait_for_task(Duration::from_secs(1)).await);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(station.read_count(), polled);
        assert_eq!(state.buffer.read().await.len() as u32, polled);
    }

    #[tokio::test]
    async fn test_concurrent_starts_spawn_one_task() {
        let state = create_state(Arc::new(MockStation::new()));

        let config = state.config.write().await;
        let starts: Vec<_> = (0..2)
            .map(|_| {
                let collector = Collector::new(Arc::clone(&state));
                tokio::spawn(async move { collector.start().await })
            })
            .collect();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        drop(config);

        let mut started = 0;
        for start in starts {
            if start.await.unwrap() {
                started += 1;
            }
        }
        assert_eq!(started, 1);
        assert!(state.collector.is_running());

        state.collector.signal_stop();
        assert!(state.collector.wait_for_task(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_poll_once_stamps_local_offset() {
        let state = AppState::with_local_offset(
            Config::default(),
            Arc::new(MockStation::new()),
            time::macros::offset!(+5),
        );

        let reading = poll_once(&state).await.unwrap();
        assert_eq!(reading.timestamp.offset(), time::macros::offset!(+5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_collector_survives_transient_failures() {
        let station = Arc::new(MockStation::new());
        station.set_transient_failures(5);
        let state = create_state(Arc::clone(&station));

        assert!(Collector::new(Arc::clone(&state)).start().await);
        tokio::time::sleep(Duration::from_millis(7500)).await;

        state.collector.signal_stop();
        state.collector.wait_for_task(Duration::from_secs(1)).await;

        let stats = state.collector.stats.read().await;
        assert_eq!(stats.failure_count, 5);
        assert!(stats.success_count >= 1);
        assert_eq!(stats.consecutive_failures, 0);
    }
}
