//! Manual cache invalidation.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use sportscal_core::league::League;

use crate::{config::RefreshScope, handlers::error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    pub league: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub invalidated: Vec<League>,
}

/// Invalidate cached schedules (GET|POST /refresh?league=).
///
/// The next feed request for an invalidated league refetches from upstream.
pub async fn refresh(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> Result<Response, AppError> {
    let invalidated = match query.league.as_deref() {
        Some(key) => vec![state.cache.invalidate(key)?],
        None => match state.config.refresh_scope {
            RefreshScope::All => state.cache.invalidate_all(),
            RefreshScope::League => {
                return Ok((
                    StatusCode::BAD_REQUEST,
                    "Missing league parameter, expected ?league=nfl or ?league=nba",
                )
                    .into_response());
            }
        },
    };

    tracing::info!(leagues = ?invalidated, "Manual refresh requested");

    Ok(Json(RefreshResponse { invalidated }).into_response())
}
