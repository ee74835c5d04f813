//! Weatherdash Service - Background collector and HTTP API.
//!
//! Run with: `cargo run -p weatherdash-service`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use time::UtcOffset;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use weatherdash_core::{SharedStation, StationClient};
use weatherdash_service::{AppState, Collector, Config, api};

/// Weatherdash Service - Background collector and HTTP REST API.
#[derive(Parser, Debug)]
#[command(name = "weatherdash-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Station base URL (overrides config).
    #[arg(short, long, env = "WEATHERDASH_STATION")]
    station: Option<String>,

    /// Poll interval in milliseconds (overrides config).
    #[arg(short, long)]
    interval: Option<u64>,

    /// Disable background collector (proxy only mode).
    #[arg(long)]
    no_collector: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let local_offset = weatherdash_service::local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(args, local_offset))
}

async fn run(args: Args, local_offset: UtcOffset) -> anyhow::Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("weatherdash_service=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(url) = args.station {
        config.station.url = url;
    }
    if let Some(ms) = args.interval {
        config.station.poll_interval_ms = ms;
    }
    config.validate()?;

    let client = StationClient::with_timeout(&config.station.url, config.station.timeout())
        .with_context(|| format!("Invalid station URL {}", config.station.url))?;
    info!("Using station at {}", client.base_url());
    let station: SharedStation = Arc::new(client);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;

    info!(offset = %local_offset, "Using local UTC offset");
    let state = AppState::with_local_offset(config, station, local_offset);

    if args.no_collector {
        info!("Background collector disabled");
    } else {
        Collector::new(Arc::clone(&state)).start().await;
    }

    let app = Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
