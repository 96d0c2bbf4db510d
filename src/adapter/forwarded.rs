//! Forwarded upstream responses.
//!
//! # Responsibilities
//! - Wrap an upstream status, headers and a deferred body
//! - Resolve the body exactly once, on demand
//! - Fall back to the descriptor view when the body is empty or falsy
//!
//! # Design Decisions
//! - The resolver is a boxed capability, so closures and `reqwest` bodies
//!   plug in the same way
//! - Falsy follows JSON-value truthiness: `null`, `false`, `0`, `""`.
//!   Empty objects and arrays are real payloads

use std::fmt;
use std::future::Future;

use axum::http::{HeaderMap, StatusCode};
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::{json, Map, Value};

use crate::adapter::error::ResolveError;

/// Deferred JSON body of a forwarded response.
pub trait ResolveBody: Send {
    /// Resolve the payload. `None` means the body was empty.
    fn resolve(self: Box<Self>) -> BoxFuture<'static, Result<Option<Value>, ResolveError>>;
}

impl<F, Fut> ResolveBody for F
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Value, ResolveError>> + Send + 'static,
{
    fn resolve(self: Box<Self>) -> BoxFuture<'static, Result<Option<Value>, ResolveError>> {
        (*self)().map(|result| result.map(Some)).boxed()
    }
}

/// Body of a `reqwest` response, decoded as JSON when resolved.
pub struct UpstreamBody(pub reqwest::Response);

impl ResolveBody for UpstreamBody {
    fn resolve(self: Box<Self>) -> BoxFuture<'static, Result<Option<Value>, ResolveError>> {
        async move {
            let bytes = self.0.bytes().await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(None);
            }
            Ok(Some(serde_json::from_slice(&bytes)?))
        }
        .boxed()
    }
}

/// An HTTP response relayed from elsewhere, with its body still pending.
pub struct ForwardedResponse {
    status: StatusCode,
    headers: HeaderMap,
    resolver: Box<dyn ResolveBody>,
}

impl ForwardedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, resolver: impl ResolveBody + 'static) -> Self {
        Self {
            status,
            headers,
            resolver: Box::new(resolver),
        }
    }

    /// Wrap a response received from an upstream service.
    pub fn from_upstream(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        Self::new(status, headers, UpstreamBody(response))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// 2xx responses count as success.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Canonical reason phrase of the status, used as the failure reason.
    pub fn reason(&self) -> Option<&'static str> {
        self.status.canonical_reason()
    }

    /// JSON view of the response itself, without its body.
    ///
    /// Repeated headers are joined with `", "`; non-UTF-8 values are skipped.
    pub fn descriptor(&self) -> Value {
        let mut headers = Map::new();
        for name in self.headers.keys() {
            let joined = self
                .headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(name.as_str().to_string(), Value::String(joined));
        }

        json!({
            "ok": self.is_ok(),
            "status": self.status.as_u16(),
            "headers": headers,
            "body": {},
        })
    }

    /// Resolve the body to the payload that should be written out.
    pub async fn resolve_body(self) -> Result<Value, ResolveError> {
        let fallback = self.descriptor();
        match self.resolver.resolve().await? {
            Some(payload) if is_truthy(&payload) => Ok(payload),
            _ => Ok(fallback),
        }
    }
}

impl fmt::Debug for ForwardedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
