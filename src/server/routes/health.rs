//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::server::state::AppState;

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Backend URL and key are set
    pub backend_configured: bool,
    /// The browser bundle's index document exists
    pub bundle_present: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let backend_configured = state.config.backend.is_configured();
    let bundle_present = state.config.server.index_path().is_file();

    let status = if backend_configured && bundle_present {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        backend_configured,
        bundle_present,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_liveness() {
        assert_eq!(liveness().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unconfigured_is_degraded() {
        let state = Arc::new(AppState::new(Config::default()));
        let Json(health) = full_health(State(state)).await;
        assert_eq!(health.status, "degraded");
        assert!(!health.backend_configured);
    }
}
