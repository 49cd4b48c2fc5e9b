use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sportscal_core::cache::{cache_error_to_status_code, CacheError};

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = if let Some(cache_error) = self.0.downcast_ref::<CacheError>() {
            let code = cache_error_to_status_code(cache_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        }

        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportscal_core::cache::FetchError;

    #[test]
    fn test_cache_errors_map_to_status() {
        let cases = [
            (
                CacheError::InvalidLeagueKind("mls".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                CacheError::UpstreamUnavailable(FetchError::RateLimited),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CacheError::UpstreamUnavailable(FetchError::Network("reset".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(AppError::from(error).into_response().status(), expected);
        }
    }

    #[test]
    fn test_other_errors_are_internal() {
        let response = AppError(anyhow::anyhow!("unexpected")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
