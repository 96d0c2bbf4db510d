//! Adapter error definitions.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while resolving the body of a forwarded response.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Reading the upstream body failed.
    #[error("upstream body error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The upstream body was not valid JSON.
    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Resolver-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Mechanical failures of the adapter.
///
/// Domain failures (`ok == false`) never show up here; they are written to
/// the sink as an error envelope.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to resolve forwarded body: {0}")]
    Resolve(#[from] ResolveError),

    #[error("invalid HTTP status code: {0}")]
    InvalidStatus(u16),

    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        let status = match self {
            AdapterError::Resolve(_) => StatusCode::BAD_GATEWAY,
            AdapterError::InvalidStatus(_) | AdapterError::Serialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        tracing::error!(status = %status, error = %self, "Adapter failed");

        (status, Json(json!({ "errors": [self.to_string()] }))).into_response()
    }
}
