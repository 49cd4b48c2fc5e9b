//! Shared application state.
//!
//! The schedule cache is built once at startup and shared by every handler
//! through this state.

use std::sync::Arc;

use sportscal_core::cache::ScheduleSource;

use crate::{cache::ScheduleCache, config::Config};

/// Shared application state.
///
/// Cheap to clone: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ScheduleCache>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create state whose cache fetches from `source`, tuned by `config`.
    pub fn new(source: Arc<dyn ScheduleSource>, config: Config) -> Self {
        let cache = ScheduleCache::new(source, config.cache_ttl(), config.upstream_timeout());

        tracing::debug!(
            ttl_secs = config.cache_ttl_seconds,
            upstream_timeout_secs = config.upstream_timeout_seconds,
            refresh_scope = %config.refresh_scope,
            "Schedule cache created"
        );

        Self {
            cache: Arc::new(cache),
            config: Arc::new(config),
        }
    }
}
