//! Site Host
//!
//! Serves the built browser bundle with axum.
//!
//! # Endpoints
//!
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//! - `GET /api/v1/site-config` - Public runtime settings for the bundle
//! - everything else - files from `server.static_dir`, falling back to the
//!   index document so deep links such as `/admin/dashboard` or
//!   `/post/<id>` load the app

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{Config, ServerConfig};

/// Build the host router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let api_routes = Router::new().route("/site-config", get(routes::site_config::site_config));

    let bundle = ServeDir::new(&server.static_dir).fallback(ServeFile::new(server.index_path()));
    let cors = cors_layer(server);

    Router::new()
        .nest("/health", health_routes)
        .nest("/api/v1", api_routes)
        .fallback_service(bundle)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::HEAD])
}

/// Start the site host
pub async fn serve(config: Config) -> ServerResult<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    if !config.server.index_path().is_file() {
        tracing::warn!(
            path = ?config.server.index_path(),
            "Index document missing; build the browser bundle first"
        );
    }
    if !config.backend.is_configured() {
        tracing::warn!("Backend not configured; /api/v1/site-config will answer 503");
    }

    let router = build_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Implexa site listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    tracing::info!("Implexa site shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
