//! Roomsense Service - Background refresher and HTTP API.
//!
//! Run with: `cargo run -p roomsense-service`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use roomsense_service::{AppState, Config, Refresher, api};

/// Roomsense Service - Background refresher and HTTP REST API.
#[derive(Parser, Debug)]
#[command(name = "roomsense-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Refresh interval in seconds (overrides config).
    #[arg(short, long)]
    interval: Option<u64>,

    /// Disable the background refresher (API only mode).
    #[arg(long)]
    no_refresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roomsense_service=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(interval) = args.interval {
        config.refresh.interval_secs = interval;
    }

    config.validate()?;

    info!(rooms = config.rooms.len(), "building sensor store");
    let state = AppState::new(config.clone())?;

    // Start the background refresher
    if !args.no_refresh {
        let refresher = Refresher::new(Arc::clone(&state));
        refresher.start();
    } else {
        info!("background refresher disabled");
    }

    // Build the router
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

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse()?;

    info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
