//! The adapter itself.
//!
//! # Responsibilities
//! - Write failures as `{ "errors": [reason] }` (default 400)
//! - Hand successful results back untouched when sending is disabled
//! - Write successful results as JSON (default 200), resolving forwarded
//!   bodies first
//!
//! # Design Decisions
//! - Status is resolved before any sink call, so an `Err` never leaves a
//!   half-written sink
//! - Exactly one `status` and one `json` call per written response
//! - No timeout or retry around the forwarded body; callers own that

use axum::http::StatusCode;
use serde_json::json;

use crate::adapter::error::AdapterError;
use crate::adapter::result::ServiceResult;
use crate::adapter::sink::ResponseSink;
use crate::observability::metrics;

/// Knobs for [`adapt_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptOptions {
    /// Write successful results to the sink. When false they are returned
    /// as [`Adapted::Passthrough`]. Failures are written regardless.
    pub send_response: bool,
}

impl Default for AdaptOptions {
    fn default() -> Self {
        Self { send_response: true }
    }
}

/// Outcome of adapting a result.
#[derive(Debug)]
pub enum Adapted<W> {
    /// The sink produced a response.
    Written(W),
    /// The sink was not touched; the result is handed back unchanged.
    Passthrough(ServiceResult),
}

impl<W> Adapted<W> {
    pub fn written(self) -> Option<W> {
        match self {
            Adapted::Written(written) => Some(written),
            Adapted::Passthrough(_) => None,
        }
    }

    pub fn passthrough(self) -> Option<ServiceResult> {
        match self {
            Adapted::Written(_) => None,
            Adapted::Passthrough(result) => Some(result),
        }
    }
}

/// Adapt `result` onto `sink` with [`AdaptOptions::default`], i.e. with
/// `send_response = true`.
pub async fn adapt<S: ResponseSink>(
    sink: &mut S,
    result: ServiceResult,
) -> Result<Adapted<S::Written>, AdapterError> {
    adapt_with(sink, result, AdaptOptions::default()).await
}

/// Adapt `result` onto `sink`.
pub async fn adapt_with<S: ResponseSink>(
    sink: &mut S,
    result: ServiceResult,
    options: AdaptOptions,
) -> Result<Adapted<S::Written>, AdapterError> {
    if result.is_ok() && !options.send_response {
        tracing::debug!(outcome = "passthrough", "Returning result without writing");
        metrics::record_outcome("passthrough");
        return Ok(Adapted::Passthrough(result));
    }

    write(sink, result).await.map(Adapted::Written)
}

/// Always write `result` to `sink`.
pub async fn write<S: ResponseSink>(
    sink: &mut S,
    result: ServiceResult,
) -> Result<S::Written, AdapterError> {
    if !result.is_ok() {
        let status = status_or(result.status(), StatusCode::BAD_REQUEST)?;
        let body = json!({ "errors": [result.reason()] });

        tracing::debug!(status = %status, outcome = "failure", "Writing failure response");
        metrics::record_outcome("failure");
        return Ok(sink.status(status).json(body));
    }

    let status = status_or(result.status(), StatusCode::OK)?;
    let (outcome, body) = match result {
        ServiceResult::Plain(descriptor) => ("success", serde_json::to_value(&descriptor)?),
        ServiceResult::Forwarded(forwarded) => ("forwarded", forwarded.resolve_body().await?),
    };

    tracing::debug!(status = %status, outcome, "Writing success response");
    metrics::record_outcome(outcome);
    Ok(sink.status(status).json(body))
}

/// Explicit status if present and non-zero, otherwise `default`.
fn status_or(status: Option<u16>, default: StatusCode) -> Result<StatusCode, AdapterError> {
    match status.filter(|&code| code != 0) {
        Some(code) => StatusCode::from_u16(code).map_err(|_| AdapterError::InvalidStatus(code)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::error::ResolveError;
    use crate::adapter::forwarded::ForwardedResponse;
    use crate::adapter::result::ResultDescriptor;
    use crate::adapter::sink::{Recorder, SinkCall};
    use axum::http::HeaderMap;
    use serde_json::Value;

    #[tokio::test]
    async fn test_failure_defaults_to_bad_request() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor::failure("Operation failed");

        adapt(&mut sink, result.into()).await.unwrap();

        assert_eq!(
            sink.calls(),
            &[
                SinkCall::Status(StatusCode::BAD_REQUEST),
                SinkCall::Json(json!({ "errors": ["Operation failed"] })),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_ignores_send_response() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor::failure("I'm a teapot").with_status(418);

        let adapted = adapt_with(&mut sink, result.into(), AdaptOptions { send_response: false })
            .await
            .unwrap();

        let written = adapted.written().expect("failure must be written");
        assert_eq!(written.status, Some(StatusCode::IM_A_TEAPOT));
        assert_eq!(written.body, json!({ "errors": ["I'm a teapot"] }));
    }

    #[tokio::test]
    async fn test_failure_without_reason_writes_null() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor {
            ok: false,
            status: Some(503),
            reason: None,
            payload: Default::default(),
        };

        let written = write(&mut sink, result.into()).await.unwrap();

        assert_eq!(written.status, Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(written.body, json!({ "errors": [null] }));
    }

    #[tokio::test]
    async fn test_success_defaults_to_ok() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor::success().with_field("data", "x");

        let written = write(&mut sink, result.into()).await.unwrap();

        assert_eq!(written.status, Some(StatusCode::OK));
        assert_eq!(written.body, json!({ "ok": true, "data": "x" }));
    }

    #[tokio::test]
    async fn test_zero_status_uses_default() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor::success().with_status(0);

        let written = write(&mut sink, result.into()).await.unwrap();
        assert_eq!(written.status, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_passthrough_leaves_sink_untouched() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor::success().with_status(200).with_field("data", "x");

        let adapted = adapt_with(&mut sink, result.clone().into(), AdaptOptions { send_response: false })
            .await
            .unwrap();

        let returned = adapted.passthrough().and_then(ServiceResult::into_plain);
        assert_eq!(returned, Some(result));
        assert!(sink.is_untouched());
    }

    #[tokio::test]
    async fn test_invalid_status_touches_nothing() {
        let mut sink = Recorder::new();
        let result = ResultDescriptor::failure("bad").with_status(1000);

        let err = adapt(&mut sink, result.into()).await.unwrap_err();

        assert!(matches!(err, AdapterError::InvalidStatus(1000)));
        assert!(sink.is_untouched());
    }

    #[tokio::test]
    async fn test_forwarded_resolve_failure_touches_nothing() {
        let mut sink = Recorder::new();
        let forwarded = ForwardedResponse::new(StatusCode::OK, HeaderMap::new(), || async {
            Err::<Value, _>(ResolveError::Other("truncated body".into()))
        });

        let err = adapt(&mut sink, forwarded.into()).await.unwrap_err();

        assert!(matches!(err, AdapterError::Resolve(_)));
        assert!(sink.is_untouched());
    }

    #[tokio::test]
    async fn test_forwarded_failure_skips_resolution() {
        let mut sink = Recorder::new();
        let forwarded = ForwardedResponse::new(StatusCode::BAD_GATEWAY, HeaderMap::new(), || async {
            Err::<Value, _>(ResolveError::Other("must not be resolved".into()))
        });

        let written = write(&mut sink, forwarded.into()).await.unwrap();

        assert_eq!(written.status, Some(StatusCode::BAD_GATEWAY));
        assert_eq!(written.body, json!({ "errors": ["Bad Gateway"] }));
    }
}
