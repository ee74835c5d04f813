//! Application state shared across handlers and the collector.
//!
//! # Locking
//!
//! The collector is the only writer of `buffer` and `breaches`. Handlers take
//! a read lock, clone what they need, and release it before analysing, so a
//! slow request never stalls polling.
//!
//! When several locks are needed, acquire them in field order
//! (`config`, `thresholds`, `buffer`, `breaches`).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;

use weatherdash_core::{
    AlertThresholds, BreachLog, Reading, ReadingValidator, RollingBuffer, SharedStation,
};

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// Configuration (RwLock for runtime updates).
    pub config: RwLock<Config>,
    /// The station being polled and proxied.
    pub station: SharedStation,
    /// Breach thresholds applied by the collector.
    pub thresholds: RwLock<AlertThresholds>,
    /// Most recent live readings.
    pub buffer: RwLock<RollingBuffer<Reading>>,
    /// Most recent threshold breaches.
    pub breaches: RwLock<BreachLog>,
    pub validator: ReadingValidator,
    /// Collector control state.
    pub collector: CollectorState,
    /// Offset used to stamp readings and anchor history labels.
    pub local_offset: UtcOffset,
}

impl AppState {
    /// Create new application state with timestamps in UTC.
    ///
    /// Thresholds, validation bounds and the buffer size are taken from
    /// `config`; a zero buffer capacity falls back to the default.
    pub fn new(config: Config, station: SharedStation) -> Arc<Self> {
        Self::with_local_offset(config, station, UtcOffset::UTC)
    }

    /// Create new application state that reports times in `local_offset`.
    ///
    /// The host offset cannot be read once a multi-threaded runtime is up, so
    /// callers resolve it beforehand (see [`local_offset`]).
    pub fn with_local_offset(
        config: Config,
        station: SharedStation,
        local_offset: UtcOffset,
    ) -> Arc<Self> {
        let buffer = RollingBuffer::with_capacity(config.station.buffer_capacity)
            .unwrap_or_default();
        Arc::new(Self {
            thresholds: RwLock::new(config.thresholds),
            validator: ReadingValidator::new(config.validation.clone()),
            config: RwLock::new(config),
            station,
            buffer: RwLock::new(buffer),
            breaches: RwLock::new(BreachLog::new()),
            collector: CollectorState::new(),
            local_offset,
        })
    }

    /// Current instant in the configured local offset.
    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.local_offset)
    }

    /// The date and offset used to anchor `HH:MM:SS` history labels.
    pub fn today(&self) -> (Date, UtcOffset) {
        (self.now().date(), self.local_offset)
    }

    /// Owned copy of the buffered readings, oldest first.
    pub async fn readings(&self) -> Vec<Reading> {
        self.buffer.read().await.readings()
    }
}

/// The host's UTC offset, or UTC when it cannot be determined.
///
/// Call this before starting a multi-threaded runtime; on Unix the lookup
/// always fails once other threads exist.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// State for tracking and controlling the collector.
pub struct CollectorState {
    /// Whether the collector is currently running.
    running: AtomicBool,
    /// When the collector was started (Unix timestamp).
    started_at: AtomicU64,
    /// Channel to signal the polling task to stop.
    stop_tx: watch::Sender<bool>,
    /// Receiver for stop signal (cloned by the polling task).
    stop_rx: watch::Receiver<bool>,
    /// Handle of the polling task, if one was spawned.
    task: Mutex<Option<JoinHandle<()>>>,
    /// Polling statistics.
    pub stats: RwLock<CollectionStats>,
}

impl CollectorState {
    pub fn new() -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            running: AtomicBool::new(false),
            started_at: AtomicU64::new(0),
            stop_tx,
            stop_rx,
            task: Mutex::new(None),
            stats: RwLock::new(CollectionStats::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Atomically move from stopped to running, recording the start time.
    ///
    /// Returns `false` without touching anything if already running.
    pub fn try_start(&self) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        let now = OffsetDateTime::now_utc().unix_timestamp() as u64;
        self.started_at.store(now, Ordering::SeqCst);
        true
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        match self.started_at.load(Ordering::SeqCst) {
            0 => None,
            ts => OffsetDateTime::from_unix_timestamp(ts as i64).ok(),
        }
    }

    /// Get a receiver for the stop signal.
    pub fn subscribe_stop(&self) -> watch::Receiver<bool> {
        self.stop_rx.clone()
    }

    /// Signal the polling task to stop.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(true);
        self.running.store(false, Ordering::SeqCst);
    }

    /// Reset the stop signal (for restarting).
    pub fn reset_stop(&self) {
        let _ = self.stop_tx.send(false);
    }

    /// Remember the spawned polling task.
    pub async fn set_task(&self, handle: JoinHandle<()>) {
        *self.task.lock().await = Some(handle);
    }

    /// Wait for the polling task to finish, aborting it after `timeout`.
    ///
    /// Returns `true` if the task exited on its own (or none was running).
    pub async fn wait_for_task(&self, timeout: std::time::Duration) -> bool {
        let Some(mut handle) = self.task.lock().await.take() else {
            return true;
        };

        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(_) => true,
            Err(_) => {
                handle.abort();
                false
            }
        }
    }
}

impl Default for CollectorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Polling statistics reported by `/api/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionStats {
    /// Time of last successful poll.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_poll_at: Option<OffsetDateTime>,
    /// Time of last failed poll.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_error_at: Option<OffsetDateTime>,
    pub last_error: Option<String>,
    /// Total samples buffered.
    pub success_count: u64,
    /// Total polls that failed to reach the station.
    pub failure_count: u64,
    /// Samples dropped by validation.
    pub rejected_count: u64,
    /// Failures since the last success.
    pub consecutive_failures: u32,
    /// Whether the last poll reached the station.
    pub station_online: bool,
}

impl CollectionStats {
    /// Record a buffered sample.
    pub fn record_success(&mut self, at: OffsetDateTime) {
        self.last_poll_at = Some(at);
        self.success_count += 1;
        self.consecutive_failures = 0;
        self.station_online = true;
    }

    /// Record a sample the station returned but validation dropped.
    pub fn record_rejected(&mut self, at: OffsetDateTime, reason: String) {
        self.last_poll_at = Some(at);
        self.rejected_count += 1;
        self.last_error = Some(reason);
        self.last_error_at = Some(at);
        self.consecutive_failures = 0;
        self.station_online = true;
    }

    /// Record a failed poll; returns the consecutive failure count.
    pub fn record_failure(&mut self, at: OffsetDateTime, error: String) -> u32 {
        self.last_error_at = Some(at);
        self.last_error = Some(error);
        self.failure_count += 1;
        self.consecutive_failures += 1;
        self.station_online = false;
        self.consecutive_failures
    }
}
