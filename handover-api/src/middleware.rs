//! Request-boundary middleware helpers

use std::any::Any;
use std::time::Duration;

use axum::response::{IntoResponse, Response};
use axum::BoxError;

use crate::error::ApiError;

/// Turn a panic in a request handler into a 500 JSON response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer::custom`.
/// The panic payload is logged and never sent to the client.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = detail, "Request handler panicked");
    ApiError::internal_error("Internal server error").into_response()
}

/// Map an error from the request timeout stack to an `ApiError`.
///
/// Installed through `axum::error_handling::HandleErrorLayer` in front of
/// `tower::timeout::TimeoutLayer`. An elapsed deadline becomes a 504
/// `TIMEOUT` body.
pub fn request_error(err: BoxError, limit: Duration) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!(limit = ?limit, "Request timed out");
        ApiError::request_timeout(limit)
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal_error("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::http::StatusCode;

    #[test]
    fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_elapsed_becomes_timeout() {
        let err = request_error(
            Box::new(tower::timeout::error::Elapsed::new()),
            Duration::from_secs(30),
        );
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let err = request_error("socket closed".into(), Duration::from_secs(30));
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
