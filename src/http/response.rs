//! Writing adapted results as axum responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::adapter::{self, ResponseSink, ServiceResult};

/// Sink producing an axum [`Response`]. Status defaults to 200.
#[derive(Debug, Default)]
pub struct AxumSink {
    status: StatusCode,
}

impl ResponseSink for AxumSink {
    type Written = Response;

    fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    fn json(&mut self, body: Value) -> Response {
        (self.status, Json(body)).into_response()
    }
}

/// Adapt `result` into a response, turning adapter errors into their
/// own error envelope.
pub async fn respond(result: ServiceResult) -> Response {
    match adapter::write(&mut AxumSink::default(), result).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
