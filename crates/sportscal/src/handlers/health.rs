//! Health check endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use sportscal_core::cache::LeagueStatus;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub leagues: Vec<LeagueStatus>,
}

/// GET /health - Liveness plus per-league cache state.
///
/// Reads cache bookkeeping only and never triggers an upstream fetch.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        leagues: state.cache.status(Utc::now()),
    })
}
