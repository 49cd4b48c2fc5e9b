//! Upstream client error types.

use sportscal_core::cache::FetchError;
use thiserror::Error;

/// Result type alias for upstream requests.
pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Errors that can occur while talking to the upstream API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("Invalid JSON from upstream: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

impl From<UpstreamError> for FetchError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::RateLimited => FetchError::RateLimited,
            UpstreamError::Request(_) | UpstreamError::Status { .. } => {
                FetchError::Network(err.to_string())
            }
            UpstreamError::Json(_) | UpstreamError::Shape(_) => {
                FetchError::UpstreamFormat(err.to_string())
            }
        }
    }
}
