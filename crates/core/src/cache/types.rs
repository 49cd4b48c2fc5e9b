use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::league::League;
use crate::schedule::ScheduleRecord;

use super::{EntryState, FailureKind, FetchError};

/// Result of a successful cache read.
///
/// `records` is a shared read-only snapshot: a later refresh replaces the
/// entry's snapshot without touching the one handed out here.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup {
    pub league: League,
    pub records: Arc<[ScheduleRecord]>,
    /// When `records` was fetched from upstream.
    pub fetched_at: DateTime<Utc>,
    /// Set when a refresh failed and older data was served instead.
    pub warning: Option<FetchError>,
}

impl CacheLookup {
    /// Returns true if this lookup served data after a failed refresh.
    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }
}

/// Read-only view of one league's cache entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueStatus {
    pub league: League,
    pub state: EntryState,
    pub fetched_at: Option<DateTime<Utc>>,
    pub record_count: usize,
    /// Kind of the most recent refresh failure, cleared on success.
    pub last_failure: Option<FailureKind>,
}
