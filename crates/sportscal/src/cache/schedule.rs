//! Per-league schedule cache with single-flight refresh.
//!
//! Each league owns an entry guarded by its own mutex, so work on one league
//! never blocks another. The mutex is only held for bookkeeping, never across
//! an await.
//!
//! A refresh is spawned as its own task and announced through a
//! `watch` channel stored on the entry. Every caller that finds the entry
//! refreshing clones the receiver and waits for the same outcome, so a
//! league has at most one upstream fetch in flight. Because the refresh is
//! not driven by the caller that started it, a dropped request does not
//! cancel it.
//!
//! Invalidation bumps a per-entry generation. A snapshot remembers the
//! generation that was current when its fetch started, so a fetch that was
//! already in flight when `invalidate` ran is stored but not trusted.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use tokio::sync::watch;

use sportscal_core::cache::{
    classify, CacheError, CacheLookup, EntryState, FailureKind, FetchError, LeagueStatus, Result,
    ScheduleSource,
};
use sportscal_core::league::League;
use sportscal_core::schedule::ScheduleRecord;

/// Outcome of a refresh, shared by every caller waiting on it.
type Outcome = Result<CacheLookup>;

type OutcomeReceiver = watch::Receiver<Option<Outcome>>;

/// Schedule data as of one successful fetch.
#[derive(Debug, Clone)]
struct Snapshot {
    records: Arc<[ScheduleRecord]>,
    fetched_at: DateTime<Utc>,
    /// Entry generation when the fetch started.
    generation: u64,
}

impl Snapshot {
    fn to_lookup(&self, league: League, warning: Option<FetchError>) -> CacheLookup {
        CacheLookup {
            league,
            records: Arc::clone(&self.records),
            fetched_at: self.fetched_at,
            warning,
        }
    }
}

#[derive(Debug, Default)]
struct EntryInner {
    snapshot: Option<Snapshot>,
    generation: u64,
    in_flight: Option<OutcomeReceiver>,
    last_failure: Option<FailureKind>,
}

impl EntryInner {
    /// A refresh counts as in flight only while its task still holds the sender.
    fn is_refreshing(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|rx| rx.has_changed().is_ok())
    }

    fn state(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> EntryState {
        let fetched_at = self.snapshot.as_ref().map(|s| s.fetched_at);
        let invalidated = self
            .snapshot
            .as_ref()
            .is_some_and(|s| s.generation < self.generation);
        classify(fetched_at, invalidated, self.is_refreshing(), now, ttl)
    }
}

#[derive(Debug, Default)]
struct Entry {
    inner: Mutex<EntryInner>,
}

impl Entry {
    // Poisoning can only come from a panic inside our own bookkeeping, which
    // leaves the fields consistent, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, EntryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// What a `get` call must do after inspecting the entry.
enum Step {
    Hit(CacheLookup),
    Wait(OutcomeReceiver),
}

/// Everything a spawned refresh needs to publish its outcome.
struct RefreshJob {
    league: League,
    entry: Arc<Entry>,
    source: Arc<dyn ScheduleSource>,
    timeout: Duration,
    started_at: DateTime<Utc>,
    generation: u64,
    tx: watch::Sender<Option<Outcome>>,
}

/// In-process cache of league schedules.
///
/// Constructed once at startup and shared through application state.
pub struct ScheduleCache {
    source: Arc<dyn ScheduleSource>,
    ttl: chrono::Duration,
    upstream_timeout: Duration,
    entries: Mutex<HashMap<League, Arc<Entry>>>,
}

impl ScheduleCache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `source` - Where schedules are fetched from on miss or expiry.
    /// * `ttl` - How long a fetched schedule is served without refetching.
    /// * `upstream_timeout` - Bound on one whole fetch; expiry counts as a
    ///   network failure.
    pub fn new(source: Arc<dyn ScheduleSource>, ttl: Duration, upstream_timeout: Duration) -> Self {
        Self {
            source,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            upstream_timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the schedule for `key`, refreshing it first if needed.
    ///
    /// Fresh data is returned without suspending. Empty or stale data is
    /// refreshed, and callers arriving during a refresh wait for it instead
    /// of starting their own. When a refresh fails but older data exists,
    /// that data is returned with the failure attached as a warning.
    ///
    /// # Errors
    ///
    /// * [`CacheError::InvalidLeagueKind`] if `key` is not a supported league.
    /// * [`CacheError::UpstreamUnavailable`] if the refresh failed and no
    ///   data of any age exists.
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<CacheLookup> {
        let league: League = key.parse()?;
        let entry = self.entry(league);

        match self.begin(league, &entry, now) {
            Step::Hit(lookup) => Ok(lookup),
            Step::Wait(rx) => wait_for_outcome(rx).await,
        }
    }

    /// Forces the next `get` for `key` to refetch.
    ///
    /// A refresh already in flight keeps running and its result is stored,
    /// but it does not count as fresh for reads after this call.
    pub fn invalidate(&self, key: &str) -> Result<League> {
        let league: League = key.parse()?;
        self.invalidate_league(league);
        Ok(league)
    }

    /// Invalidates every supported league and returns them.
    pub fn invalidate_all(&self) -> Vec<League> {
        League::ALL
            .into_iter()
            .inspect(|league| self.invalidate_league(*league))
            .collect()
    }

    /// Reports the state of every supported league without fetching.
    pub fn status(&self, now: DateTime<Utc>) -> Vec<LeagueStatus> {
        League::ALL
            .into_iter()
            .map(|league| match self.existing(league) {
                Some(entry) => {
                    let inner = entry.lock();
                    LeagueStatus {
                        league,
                        state: inner.state(now, self.ttl),
                        fetched_at: inner.snapshot.as_ref().map(|s| s.fetched_at),
                        record_count: inner.snapshot.as_ref().map_or(0, |s| s.records.len()),
                        last_failure: inner.last_failure,
                    }
                }
                None => LeagueStatus {
                    league,
                    state: EntryState::Empty,
                    fetched_at: None,
                    record_count: 0,
                    last_failure: None,
                },
            })
            .collect()
    }

    fn invalidate_league(&self, league: League) {
        // Entries are created by reads; nothing cached means nothing to drop.
        let Some(entry) = self.existing(league) else {
            tracing::debug!(league = %league, "Invalidate on empty cache entry");
            return;
        };

        let mut inner = entry.lock();
        inner.generation += 1;
        tracing::info!(
            league = %league,
            generation = inner.generation,
            refreshing = inner.is_refreshing(),
            "Schedule invalidated"
        );
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<League, Arc<Entry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn entry(&self, league: League) -> Arc<Entry> {
        Arc::clone(self.entries().entry(league).or_default())
    }

    fn existing(&self, league: League) -> Option<Arc<Entry>> {
        self.entries().get(&league).cloned()
    }

    /// Decides, under the entry lock, whether to serve, join or start a refresh.
    fn begin(&self, league: League, entry: &Arc<Entry>, now: DateTime<Utc>) -> Step {
        let mut inner = entry.lock();

        if let Some(rx) = inner.in_flight.clone() {
            if rx.has_changed().is_ok() {
                tracing::debug!(league = %league, "Joining in-flight schedule refresh");
                return Step::Wait(rx);
            }
            tracing::warn!(league = %league, "Discarding abandoned schedule refresh");
            inner.in_flight = None;
        }

        let state = inner.state(now, self.ttl);
        if let (EntryState::Fresh, Some(snapshot)) = (state, &inner.snapshot) {
            tracing::trace!(league = %league, "Cache hit for schedule");
            return Step::Hit(snapshot.to_lookup(league, None));
        }

        tracing::info!(league = %league, state = ?state, "Refreshing schedule");

        let (tx, rx) = watch::channel(None);
        inner.in_flight = Some(rx.clone());
        let job = RefreshJob {
            league,
            entry: Arc::clone(entry),
            source: Arc::clone(&self.source),
            timeout: self.upstream_timeout,
            started_at: now,
            generation: inner.generation,
            tx,
        };
        drop(inner);

        tokio::spawn(refresh(job));
        Step::Wait(rx)
    }
}

/// Runs one upstream fetch and publishes its outcome to the entry and waiters.
async fn refresh(job: RefreshJob) {
    let RefreshJob {
        league,
        entry,
        source,
        timeout,
        started_at,
        generation,
        tx,
    } = job;

    let fetch = AssertUnwindSafe(source.fetch(league)).catch_unwind();
    let result = match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(FetchError::Network("schedule fetch panicked".to_string())),
        Err(_) => Err(FetchError::Network(format!(
            "upstream timed out after {}s",
            timeout.as_secs_f64()
        ))),
    };

    let outcome = {
        let mut inner = entry.lock();
        inner.in_flight = None;

        match result {
            Ok(records) => {
                let snapshot = Snapshot {
                    records: records.into(),
                    fetched_at: started_at,
                    generation,
                };
                tracing::info!(
                    league = %league,
                    records = snapshot.records.len(),
                    fetched_at = %started_at,
                    "Schedule refreshed"
                );
                let lookup = snapshot.to_lookup(league, None);
                inner.snapshot = Some(snapshot);
                inner.last_failure = None;
                Ok(lookup)
            }
            Err(err) => {
                inner.last_failure = Some(err.kind());
                match &inner.snapshot {
                    Some(snapshot) => {
                        tracing::warn!(
                            league = %league,
                            kind = %err.kind(),
                            error = %err,
                            fetched_at = %snapshot.fetched_at,
                            "Schedule refresh failed, serving stale data"
                        );
                        Ok(snapshot.to_lookup(league, Some(err)))
                    }
                    None => {
                        tracing::warn!(
                            league = %league,
                            kind = %err.kind(),
                            error = %err,
                            "Schedule refresh failed with no cached data"
                        );
                        Err(CacheError::UpstreamUnavailable(err))
                    }
                }
            }
        }
    };

    tx.send_replace(Some(outcome));
}

async fn wait_for_outcome(mut rx: OutcomeReceiver) -> Result<CacheLookup> {
    let abandoned =
        || CacheError::UpstreamUnavailable(FetchError::Network("refresh abandoned".to_string()));

    let outcome = rx.wait_for(Option::is_some).await.map_err(|_| abandoned())?;
    match outcome.as_ref() {
        Some(result) => result.clone(),
        None => Err(abandoned()),
    }
}
