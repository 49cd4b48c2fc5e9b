//! iCalendar feed handler.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};

use sportscal_core::feed::build_calendar;

use crate::{handlers::error::AppError, state::AppState};

/// When the served schedule was fetched from upstream, RFC 3339.
pub const FETCHED_AT_HEADER: HeaderName = HeaderName::from_static("x-schedule-fetched-at");

/// Failure kind of the last refresh, present only when stale data is served.
pub const WARNING_HEADER: HeaderName = HeaderName::from_static("x-schedule-warning");

const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Serve a league calendar (GET /{league}.ics).
pub async fn league_feed(
    State(state): State<AppState>,
    Path(feed): Path<String>,
) -> Result<Response, AppError> {
    let Some(key) = feed.strip_suffix(".ics") else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let now = Utc::now();
    let lookup = state.cache.get(key, now).await?;

    let calendar = build_calendar(
        lookup.league,
        &lookup.records,
        &state.config.feed_window(),
        now,
        lookup.fetched_at,
    );

    for skipped in &calendar.skipped {
        tracing::warn!(
            league = %lookup.league,
            event_id = ?skipped.id,
            reason = ?skipped.reason,
            "Skipping unrenderable event"
        );
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CALENDAR_CONTENT_TYPE),
    );
    headers.insert(
        FETCHED_AT_HEADER,
        HeaderValue::from_str(
            &lookup
                .fetched_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        )?,
    );
    if let Some(warning) = &lookup.warning {
        headers.insert(
            WARNING_HEADER,
            HeaderValue::from_static(warning.kind().as_str()),
        );
    }

    tracing::debug!(
        league = %lookup.league,
        events = calendar.event_count,
        skipped = calendar.skipped.len(),
        degraded = lookup.is_degraded(),
        "Serving calendar feed"
    );

    Ok((headers, calendar.body).into_response())
}
