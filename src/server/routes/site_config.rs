//! GET /api/v1/site-config
//!
//! Public runtime settings the browser bundle starts from.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

pub async fn site_config(State(state): State<Arc<AppState>>) -> ServerResult<Json<SiteConfig>> {
    SiteConfig::from_config(&state.config)
        .map(Json)
        .ok_or_else(|| ServerError::NotConfigured("backend url and anon_key are required".to_string()))
}
