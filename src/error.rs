// Gateway error → HTTP response
//
// Every failure becomes a 500 with a fixed per-operation message and the raw error
// detail. Upstream status (if any) is reported but never forwarded.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::upstream::UpstreamError;

pub const FETCH_ALL_FAILED: &str = "Error fetching expenses";
pub const FETCH_ONE_FAILED: &str = "Error fetching expense";
pub const CREATE_FAILED: &str = "Error creating expense";
pub const UPDATE_FAILED: &str = "Error updating expense";
pub const DELETE_FAILED: &str = "Error deleting expense";
pub const DATE_RANGE_FAILED: &str = "Error fetching expenses by date range";
pub const CATEGORY_FAILED: &str = "Error fetching expenses by category";

/// What made an operation fail
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Create/update body that is not JSON at all
    #[error("request body is not valid JSON: {0}")]
    Body(#[source] serde_json::Error),
}

impl FailureCause {
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FailureCause::Upstream(err) => err.upstream_status().map(|s| s.as_u16()),
            FailureCause::Body(_) => None,
        }
    }
}

/// Failure of a single gateway operation
#[derive(Debug)]
pub struct GatewayError {
    pub message: &'static str,
    pub source: FailureCause,
}

impl GatewayError {
    pub fn new(message: &'static str, source: impl Into<FailureCause>) -> Self {
        Self {
            message,
            source: source.into(),
        }
    }

    pub fn bad_body(message: &'static str, err: serde_json::Error) -> Self {
        Self::new(message, FailureCause::Body(err))
    }
}

/// Error body: `{ "message": ..., "error": { "detail": ..., "upstream_status": ... } }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        Self {
            message: err.message,
            error: ErrorDetail {
                detail: err.source.to_string(),
                upstream_status: err.source.upstream_status(),
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody::from(&self);
        error!(
            operation = self.message,
            error = %self.source,
            upstream_status = ?body.error.upstream_status,
            "expense operation failed"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Attach an operation's fixed message to an upstream result
pub trait OrGatewayError<T> {
    fn or_gateway_error(self, message: &'static str) -> Result<T, GatewayError>;
}

impl<T> OrGatewayError<T> for Result<T, UpstreamError> {
    fn or_gateway_error(self, message: &'static str) -> Result<T, GatewayError> {
        self.map_err(|source| GatewayError::new(message, source))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_error() -> UpstreamError {
        UpstreamError::Decode(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
    }

    #[test]
    fn test_error_body_shape() {
        let err = GatewayError::new(FETCH_ALL_FAILED, decode_error());
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();

        assert_eq!(body["message"], "Error fetching expenses");
        assert!(body["error"]["detail"].as_str().unwrap().contains("unexpected payload"));
        assert!(body["error"].get("upstream_status").is_none());
    }

    #[test]
    fn test_bad_body_has_no_upstream_status() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{\"title\":").unwrap_err();
        let err = GatewayError::bad_body(CREATE_FAILED, parse_err);
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();

        assert_eq!(body["message"], "Error creating expense");
        assert!(body["error"]["detail"].as_str().unwrap().contains("not valid JSON"));
        assert!(body["error"].get("upstream_status").is_none());
    }

    #[test]
    fn test_response_is_always_500() {
        let response = GatewayError::new(DELETE_FAILED, decode_error()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_or_gateway_error_keeps_ok() {
        let ok: Result<u8, UpstreamError> = Ok(3);
        assert_eq!(ok.or_gateway_error(CREATE_FAILED).unwrap(), 3);

        let err: Result<u8, UpstreamError> = Err(decode_error());
        assert_eq!(err.or_gateway_error(CREATE_FAILED).unwrap_err().message, CREATE_FAILED);
    }
}
