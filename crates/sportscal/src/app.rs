use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{feeds::league_feed, health::health, refresh::refresh, root::root},
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // Calendar clients and dashboards fetch feeds cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            crate::handlers::feeds::FETCHED_AT_HEADER,
            crate::handlers::feeds::WARNING_HEADER,
        ]);

    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/refresh", get(refresh).post(refresh))
        .route("/{feed}", get(league_feed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
