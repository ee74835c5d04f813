//! REST API endpoints for the weatherdash service.
//!
//! Station proxies (`/api/data`, `/api/history`, `/api/analysis-data`,
//! `/api/export`) go straight to the station on every request and answer
//! `502 Bad Gateway` when it cannot be reached. Everything else is served
//! from state the collector keeps up to date.
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]:
//! `{"error": "..."}`.
//!
//! # Example
//!
//! ```ignore
//! use weatherdash_service::api;
//!
//! let app = api::router().with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use weatherdash_core::export::{self, CSV_CONTENT_TYPE, EXPORT_FILENAME};
use weatherdash_core::history;
use weatherdash_core::{
    AlertThresholds, AnalysisSnapshot, Breach, CurrentSample, HistoryEntry, HistoryFilter,
    Reading, ThresholdUpdate, TimedHistoryEntry, WeatherStation, analyze,
};

use crate::collector::Collector;
use crate::state::{AppState, CollectionStats};

/// Create the API router.
///
/// `GET` routes answer `HEAD` as well.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Health and status
        .route("/api/health", get(health))
        .route("/api/status", get(get_status))
        // Station proxies
        .route("/api/data", get(get_data))
        .route("/api/history", get(get_history))
        .route("/api/analysis-data", get(get_analysis_data))
        .route("/api/export", get(export_csv))
        // Live buffer and analysis
        .route("/api/readings", get(get_readings))
        .route("/api/analysis", get(get_analysis))
        .route("/api/analysis/history", get(get_history_analysis))
        // Breach thresholds
        .route("/api/thresholds", get(get_thresholds).put(update_thresholds))
        .route("/api/alerts", get(get_alerts))
        // Collector control
        .route("/api/collector/start", post(collector_start))
        .route("/api/collector/stop", post(collector_stop))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Service status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub station: StationStatus,
    pub collector: CollectorStatus,
    pub buffer: BufferStatus,
}

/// Station the service talks to.
#[derive(Debug, Serialize)]
pub struct StationStatus {
    pub endpoint: String,
    pub poll_interval_ms: u64,
}

/// Collector status.
#[derive(Debug, Serialize)]
pub struct CollectorStatus {
    pub running: bool,
    /// When the collector was started (if ever).
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    /// How long the collector has been running (in seconds).
    pub uptime_seconds: Option<u64>,
    #[serde(flatten)]
    pub stats: CollectionStats,
}

/// Rolling buffer fill level.
#[derive(Debug, Serialize)]
pub struct BufferStatus {
    pub len: usize,
    pub capacity: usize,
}

/// Get service status including collector state and buffer fill.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let poll_interval_ms = state.config.read().await.station.poll_interval().as_millis();

    let running = state.collector.is_running();
    let started_at = state.collector.started_at();
    let uptime_seconds = started_at.filter(|_| running).map(|s| {
        let now = OffsetDateTime::now_utc();
        (now - s).whole_seconds().max(0) as u64
    });
    let stats = state.collector.stats.read().await.clone();

    let buffer = {
        let buffer = state.buffer.read().await;
        BufferStatus {
            len: buffer.len(),
            capacity: buffer.capacity(),
        }
    };

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
        station: StationStatus {
            endpoint: state.station.endpoint().to_string(),
            poll_interval_ms,
        },
        collector: CollectorStatus {
            running,
            started_at,
            uptime_seconds,
            stats,
        },
        buffer,
    })
}

// ==========================================================================
// Station proxies
// ==========================================================================

/// Latest sample straight from the station.
async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<CurrentSample>, AppError> {
    Ok(Json(state.station.current().await?))
}

/// Query parameters for history endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Earliest `HH:MM:SS` label (inclusive).
    pub start: Option<String>,
    /// Latest `HH:MM:SS` label (inclusive).
    pub end: Option<String>,
    /// Keep only the most recent N entries.
    pub limit: Option<usize>,
}

impl HistoryQuery {
    /// Build the history filter, rejecting malformed labels.
    pub fn filter(&self) -> Result<HistoryFilter, AppError> {
        let filter = HistoryFilter {
            start: self.start.clone(),
            end: self.end.clone(),
            limit: self.limit,
        };
        filter
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if let (Some(start), Some(end)) = (&filter.start, &filter.end)
            && start > end
        {
            return Err(AppError::BadRequest(format!(
                "Invalid time range: 'start' ({}) must not be after 'end' ({})",
                start, end
            )));
        }
        Ok(filter)
    }
}

/// Fetch station history and apply the query filter.
async fn filtered_history(
    state: &AppState,
    params: &HistoryQuery,
) -> Result<Vec<HistoryEntry>, AppError> {
    let filter = params.filter()?;
    let entries = state.station.history().await?;
    if filter.is_empty() {
        Ok(entries)
    } else {
        Ok(filter.apply(&entries))
    }
}

/// Station history, optionally filtered by `start`, `end` and `limit`.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(filtered_history(&state, &params).await?))
}

/// Station history with absolute timestamps anchored on today's date.
async fn get_analysis_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<TimedHistoryEntry>>, AppError> {
    let entries = filtered_history(&state, &params).await?;
    let (date, offset) = state.today();
    let timed = history::with_timestamps(&entries, date, offset).map_err(|e| {
        warn!("Station sent malformed history: {}", e);
        AppError::BadGateway(e.to_string())
    })?;
    Ok(Json(timed))
}

/// Station history as a CSV download.
async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = filtered_history(&state, &params).await?;
    let csv = export::to_csv(&entries, true);

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                export::content_disposition(EXPORT_FILENAME),
            ),
        ],
        csv,
    ))
}

// ==========================================================================
// Live buffer and analysis
// ==========================================================================

/// Query parameters for `/api/readings`.
#[derive(Debug, Deserialize, Default)]
pub struct ReadingsQuery {
    /// Keep only the most recent N readings.
    pub limit: Option<usize>,
}

/// Buffered readings, oldest first.
async fn get_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReadingsQuery>,
) -> Json<Vec<Reading>> {
    let buffer = state.buffer.read().await;
    let readings = match params.limit {
        Some(n) => buffer.tail(n),
        None => buffer.readings(),
    };
    Json(readings)
}

/// Analysis over the rolling buffer.
async fn get_analysis(State(state): State<Arc<AppState>>) -> Json<AnalysisSnapshot> {
    let readings = state.readings().await;
    Json(analyze(&readings))
}

/// Analysis over station history.
async fn get_history_analysis(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<AnalysisSnapshot>, AppError> {
    let entries = filtered_history(&state, &params).await?;
    let (date, offset) = state.today();
    let readings = history::to_readings(&entries, date, offset)
        .map_err(|e| AppError::BadGateway(e.to_string()))?;
    Ok(Json(analyze(&readings)))
}

// ==========================================================================
// Thresholds and breaches
// ==========================================================================

async fn get_thresholds(State(state): State<Arc<AppState>>) -> Json<AlertThresholds> {
    Json(*state.thresholds.read().await)
}

/// Partially update the breach thresholds.
///
/// Fields left out of the body keep their value. The running config is
/// updated too so `/api/status` and later reloads agree.
async fn update_thresholds(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ThresholdUpdate>,
) -> Result<Json<AlertThresholds>, AppError> {
    let mut config = state.config.write().await;
    let mut thresholds = state.thresholds.write().await;

    let mut updated = *thresholds;
    updated.apply(&update);
    updated
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    *thresholds = updated;
    config.thresholds = updated;

    if !update.is_empty() {
        info!(
            temp = updated.temp,
            hum = updated.hum,
            light = updated.light,
            "Thresholds updated"
        );
    }
    Ok(Json(updated))
}

/// Recorded threshold breaches, oldest first.
async fn get_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Breach>> {
    Json(state.breaches.read().await.entries())
}

// ==========================================================================
// Collector control
// ==========================================================================

/// Response for collector control actions.
#[derive(Debug, Serialize)]
pub struct CollectorActionResponse {
    pub success: bool,
    pub message: String,
    pub running: bool,
}

async fn collector_start(State(state): State<Arc<AppState>>) -> Json<CollectorActionResponse> {
    let started = Collector::new(Arc::clone(&state)).start().await;

    Json(CollectorActionResponse {
        success: started,
        message: if started {
            "Collector started".to_string()
        } else {
            "Collector is already running".to_string()
        },
        running: true,
    })
}

async fn collector_stop(State(state): State<Arc<AppState>>) -> Json<CollectorActionResponse> {
    use std::time::Duration;

    if !state.collector.is_running() {
        return Json(CollectorActionResponse {
            success: false,
            message: "Collector is not running".to_string(),
            running: false,
        });
    }

    state.collector.signal_stop();
    let message = if state.collector.wait_for_task(Duration::from_secs(10)).await {
        "Collector stopped"
    } else {
        "Collector stopped (polling task timed out and was aborted)"
    };

    Json(CollectorActionResponse {
        success: true,
        message: message.to_string(),
        running: false,
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// The station failed or sent something unusable.
    BadGateway(String),
    Internal(String),
}

impl From<weatherdash_core::Error> for AppError {
    fn from(e: weatherdash_core::Error) -> Self {
        use weatherdash_core::Error;

        match e {
            Error::InvalidConfig(msg) | Error::InvalidReading(msg) => AppError::BadRequest(msg),
            e @ (Error::Station(_) | Error::Client(_) | Error::Parse(_)) => {
                warn!("Station request failed: {}", e);
                AppError::BadGateway(e.to_string())
            }
            e => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
