use std::{env, fmt, str::FromStr, time::Duration};

use sportscal_core::feed::FeedWindow;
use thiserror::Error;

use crate::upstream::DEFAULT_BASE_URL;

/// Largest feed lookback or lookahead accepted from the environment.
const MAX_FEED_DAYS: i64 = 36_500;

/// What `/refresh` invalidates when no `league` parameter is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshScope {
    /// Invalidate every league.
    #[default]
    All,
    /// Require an explicit league.
    League,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid refresh scope: {0} (expected 'all' or 'league')")]
pub struct InvalidRefreshScope(String);

impl FromStr for RefreshScope {
    type Err = InvalidRefreshScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(RefreshScope::All),
            "league" => Ok(RefreshScope::League),
            _ => Err(InvalidRefreshScope(s.to_string())),
        }
    }
}

impl fmt::Display for RefreshScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshScope::All => f.write_str("all"),
            RefreshScope::League => f.write_str("league"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Schedule TTL in seconds (default: 1800)
    pub cache_ttl_seconds: u64,
    /// Bound on one whole upstream refresh in seconds (default: 30)
    pub upstream_timeout_seconds: u64,
    /// Bound on each upstream HTTP request in seconds (default: 10)
    pub upstream_request_timeout_seconds: u64,
    /// Root of the upstream schedule API
    pub upstream_base_url: String,
    /// `/refresh` behaviour without a `league` parameter (default: all)
    pub refresh_scope: RefreshScope,
    /// Days of past games included in feeds (default: 30)
    pub feed_past_days: i64,
    /// Days of future games included in feeds (default: 365)
    pub feed_future_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Schedule TTL in seconds (default: 1800)
    /// - `UPSTREAM_TIMEOUT_SECONDS` - Whole-refresh bound (default: 30)
    /// - `UPSTREAM_REQUEST_TIMEOUT_SECONDS` - Per-request bound (default: 10)
    /// - `UPSTREAM_BASE_URL` - Upstream API root (default: ESPN site API)
    /// - `REFRESH_SCOPE` - `all` or `league` (default: all)
    /// - `FEED_PAST_DAYS` - Feed lookback in days (default: 30)
    /// - `FEED_FUTURE_DAYS` - Feed lookahead in days (default: 365)
    ///
    /// Unparseable values, and feed day counts outside `0..=36500`, fall back
    /// to their defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            cache_ttl_seconds: parse_or(&lookup, "CACHE_TTL_SECONDS", defaults.cache_ttl_seconds),
            upstream_timeout_seconds: parse_or(
                &lookup,
                "UPSTREAM_TIMEOUT_SECONDS",
                defaults.upstream_timeout_seconds,
            ),
            upstream_request_timeout_seconds: parse_or(
                &lookup,
                "UPSTREAM_REQUEST_TIMEOUT_SECONDS",
                defaults.upstream_request_timeout_seconds,
            ),
            upstream_base_url: lookup("UPSTREAM_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_base_url),
            refresh_scope: parse_or(&lookup, "REFRESH_SCOPE", defaults.refresh_scope),
            feed_past_days: parse_days(&lookup, "FEED_PAST_DAYS", defaults.feed_past_days),
            feed_future_days: parse_days(&lookup, "FEED_FUTURE_DAYS", defaults.feed_future_days),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    pub fn upstream_request_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_request_timeout_seconds)
    }

    /// Bound on one HTTP request to this server, leaving room for a full refresh.
    pub fn request_timeout(&self) -> Duration {
        self.upstream_timeout().saturating_add(Duration::from_secs(5))
    }

    pub fn feed_window(&self) -> FeedWindow {
        FeedWindow {
            past_days: self.feed_past_days,
            future_days: self.feed_future_days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let window = FeedWindow::default();
        Self {
            cache_ttl_seconds: 1800,
            upstream_timeout_seconds: 30,
            upstream_request_timeout_seconds: 10,
            upstream_base_url: DEFAULT_BASE_URL.to_string(),
            refresh_scope: RefreshScope::All,
            feed_past_days: window.past_days,
            feed_future_days: window.future_days,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, default = %default, "Ignoring invalid config value");
            default
        }
    }
}

fn parse_days<F>(lookup: &F, key: &str, default: i64) -> i64
where
    F: Fn(&str) -> Option<String>,
{
    let days = parse_or(lookup, key, default);
    if (0..=MAX_FEED_DAYS).contains(&days) {
        return days;
    }

    tracing::warn!(
        key,
        value = days,
        max = MAX_FEED_DAYS,
        default,
        "Ignoring out-of-range feed window"
    );
    default
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = from_pairs(&[]);

        assert_eq!(config.cache_ttl_seconds, 1800);
        assert_eq!(config.upstream_timeout_seconds, 30);
        assert_eq!(config.upstream_request_timeout_seconds, 10);
        assert_eq!(config.upstream_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.refresh_scope, RefreshScope::All);
        assert_eq!(config.feed_window(), FeedWindow::default());
    }

    #[test]
    fn test_values_from_source() {
        let config = from_pairs(&[
            ("CACHE_TTL_SECONDS", "60"),
            ("UPSTREAM_TIMEOUT_SECONDS", "12"),
            ("UPSTREAM_REQUEST_TIMEOUT_SECONDS", "3"),
            ("UPSTREAM_BASE_URL", "http://localhost:8080/sports"),
            ("REFRESH_SCOPE", "League"),
            ("FEED_PAST_DAYS", "7"),
            ("FEED_FUTURE_DAYS", "90"),
        ]);

        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(12));
        assert_eq!(config.upstream_request_timeout(), Duration::from_secs(3));
        assert_eq!(config.upstream_base_url, "http://localhost:8080/sports");
        assert_eq!(config.refresh_scope, RefreshScope::League);
        assert_eq!(
            config.feed_window(),
            FeedWindow {
                past_days: 7,
                future_days: 90
            }
        );
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = from_pairs(&[
            ("CACHE_TTL_SECONDS", "soon"),
            ("REFRESH_SCOPE", "everything"),
            ("UPSTREAM_BASE_URL", "  "),
        ]);

        assert_eq!(config.cache_ttl_seconds, 1800);
        assert_eq!(config.refresh_scope, RefreshScope::All);
        assert_eq!(config.upstream_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_out_of_range_values_fall_back_to_defaults() {
        let config = from_pairs(&[
            ("FEED_PAST_DAYS", "-3"),
            ("FEED_FUTURE_DAYS", "200000000"),
            ("UPSTREAM_TIMEOUT_SECONDS", "18446744073709551615"),
        ]);

        assert_eq!(config.feed_window(), FeedWindow::default());
        assert_eq!(config.request_timeout(), Duration::MAX);

        let edge = from_pairs(&[("FEED_PAST_DAYS", "0"), ("FEED_FUTURE_DAYS", "36500")]);
        assert_eq!(
            edge.feed_window(),
            FeedWindow {
                past_days: 0,
                future_days: 36_500
            }
        );
    }

    #[test]
    fn test_request_timeout_exceeds_upstream_timeout() {
        let config = from_pairs(&[("UPSTREAM_TIMEOUT_SECONDS", "20")]);
        assert_eq!(config.request_timeout(), Duration::from_secs(25));
    }

    #[test]
    fn test_refresh_scope_parse() {
        assert_eq!(" all ".parse::<RefreshScope>(), Ok(RefreshScope::All));
        assert_eq!("LEAGUE".parse::<RefreshScope>(), Ok(RefreshScope::League));
        assert_eq!(
            "some".parse::<RefreshScope>().unwrap_err().to_string(),
            "Invalid refresh scope: some (expected 'all' or 'league')"
        );
    }
}
