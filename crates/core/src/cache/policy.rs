//! Pure staleness policy for cached schedules.
//!
//! Staleness is detected lazily: the cache calls [`classify`] on every read
//! and there is no background timer.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Lifecycle state of a league's cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Never fetched, or invalidated since the last fetch started.
    Empty,
    /// Holds data younger than the TTL.
    Fresh,
    /// Holds data older than the TTL.
    Stale,
    /// An upstream fetch is in flight.
    Refreshing,
}

/// Returns true if data fetched at `fetched_at` is older than `ttl` at `now`.
///
/// An age exactly equal to the TTL is still fresh.
pub fn is_expired(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(fetched_at) > ttl
}

/// Classifies a cache entry.
///
/// # Arguments
///
/// * `fetched_at` - When the stored data was fetched, `None` if no data.
/// * `invalidated` - Whether an invalidation happened after that fetch started.
/// * `refreshing` - Whether an upstream fetch is currently in flight.
/// * `now` - The caller's notion of the current time.
/// * `ttl` - How long fetched data stays fresh.
pub fn classify(
    fetched_at: Option<DateTime<Utc>>,
    invalidated: bool,
    refreshing: bool,
    now: DateTime<Utc>,
    ttl: Duration,
) -> EntryState {
    if refreshing {
        return EntryState::Refreshing;
    }

    match fetched_at {
        None => EntryState::Empty,
        Some(_) if invalidated => EntryState::Empty,
        Some(at) if is_expired(at, now, ttl) => EntryState::Stale,
        Some(_) => EntryState::Fresh,
    }
}
