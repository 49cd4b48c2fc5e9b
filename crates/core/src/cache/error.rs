use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::league::LeagueError;

/// Errors that can occur while fetching a schedule from upstream.
///
/// Every variant means "refresh failed" to the cache; the variant is kept so
/// a warning can tell a flaky network apart from an upstream contract break.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected upstream response: {0}")]
    UpstreamFormat(String),
    #[error("Rate limited by upstream")]
    RateLimited,
}

impl FetchError {
    /// Returns the failure kind without its detail message.
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) => FailureKind::NetworkError,
            FetchError::UpstreamFormat(_) => FailureKind::UpstreamFormatError,
            FetchError::RateLimited => FailureKind::RateLimited,
        }
    }
}

/// Detail-free classification of a [`FetchError`], suitable for headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NetworkError,
    UpstreamFormatError,
    RateLimited,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::NetworkError => "network_error",
            FailureKind::UpstreamFormatError => "upstream_format_error",
            FailureKind::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the schedule cache to its callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Unknown league: {0}")]
    InvalidLeagueKind(String),
    #[error("Schedule unavailable: {0}")]
    UpstreamUnavailable(FetchError),
}

impl From<LeagueError> for CacheError {
    fn from(err: LeagueError) -> Self {
        match err {
            LeagueError::Unknown(key) => CacheError::InvalidLeagueKind(key),
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
