//! Course reserves search service.
//!
//! Serves the consortium's course search and campus detection to the
//! reserves UI:
//!
//! - `GET /api/search-courses` turns the UI's search facets into a CQL query
//!   and forwards it to the FOLIO course reserves endpoint.
//! - `GET /api/campus` tells the UI which college to theme for, from an
//!   explicit `college` parameter, the visitor's address, or a public IP
//!   lookup.
//! - `GET /api/health` answers `ok`.
//!
//! Configuration comes from the environment, see [`config::Config`].
//! Logging goes through `tracing`; set `RUST_LOG` to adjust it.

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, extract::Request, middleware::Next, routing::get};
use tokio::{net::TcpListener, signal};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod api;
pub mod config;
pub mod error;
pub mod http_utils;
pub mod routes;
pub mod state;

use config::Config;
use routes::{campus_handler, health_handler, search_courses_handler};
use state::AppState;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search-courses", get(search_courses_handler))
        .route("/api/campus", get(campus_handler))
        .route("/api/health", get(health_handler))
        .layer(axum::middleware::from_fn(
            |request: Request, next: Next| async move {
                let method = request.method().clone();
                let path = request.uri().path().to_string();
                let res = next.run(request).await;
                debug!("{} {} -> {}", method, path, res.status());
                res
            },
        ))
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    init_tracing();

    info!("Loading configuration...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config)?;

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = build_router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
