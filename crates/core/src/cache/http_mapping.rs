//! Pure functions for mapping cache errors to HTTP status codes.

use super::{CacheError, FetchError};

/// Maps a [`CacheError`] to an HTTP status code.
///
/// - `InvalidLeagueKind` -> 404 (Not Found)
/// - `UpstreamUnavailable(RateLimited)` -> 503 (Service Unavailable)
/// - `UpstreamUnavailable(_)` -> 502 (Bad Gateway)
///
/// # Examples
///
/// ```
/// use sportscal_core::cache::{cache_error_to_status_code, CacheError};
///
/// let error = CacheError::InvalidLeagueKind("mls".to_string());
/// assert_eq!(cache_error_to_status_code(&error), 404);
/// ```
pub fn cache_error_to_status_code(error: &CacheError) -> u16 {
    match error {
        CacheError::InvalidLeagueKind(_) => 404,
        CacheError::UpstreamUnavailable(FetchError::RateLimited) => 503,
        CacheError::UpstreamUnavailable(_) => 502,
    }
}
