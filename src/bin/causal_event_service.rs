//! Causal Event Service Binary
//!
//! Serves the event log over HTTP for the CLI and browser clients.
//!
//! ## Configuration
//!
//! - `PORT`: Listen port (default: 8080)
//! - `HOST`: Listen address (default: 0.0.0.0)
//! - `SEED_EVENTS`: "true" to preload the sample graph (default: false)
//! - `RUST_LOG`: Log level filter (default: info for this crate and tower_http)
//! - `LOG_FORMAT`: "pretty" for human-readable logs; anything else logs JSON
//!
//! ## Usage
//!
//! ```bash
//! SEED_EVENTS=true LOG_FORMAT=pretty cargo run --bin causal_event_service --features service
//! ```

use std::net::SocketAddr;

use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use causal_events::service::{create_router, request_middleware, ServiceState};

const DEFAULT_FILTER: &str = "causal_event_service=info,causal_events=info,tower_http=info";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => registry.with(fmt::layer().with_target(true)).init(),
        _ => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .init(),
    }
}

fn listen_addr() -> Result<SocketAddr, std::net::AddrParseError> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(8080);
    format!("{host}:{port}").parse()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let state = ServiceState::from_env();
    info!(event_count = state.log.len(), "Event log ready");

    // The browser UI is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(middleware::from_fn(request_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, version = env!("CARGO_PKG_VERSION"), "Causal Event Service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Causal Event Service stopped");
    Ok(())
}
