//! Response sinks.

use axum::http::StatusCode;
use serde_json::Value;

/// Destination for an adapted response: a status code, then a JSON body.
///
/// `status` chains; `json` finishes the response and yields whatever the
/// sink produces for its caller.
pub trait ResponseSink {
    type Written;

    fn status(&mut self, status: StatusCode) -> &mut Self;

    fn json(&mut self, body: Value) -> Self::Written;
}

/// A single call made on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Status(StatusCode),
    Json(Value),
}

/// What a [`Recorder`] hands back from `json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub status: Option<StatusCode>,
    pub body: Value,
}

/// Sink that records every call in order.
///
/// For testing code that writes through a [`ResponseSink`]; the gateway
/// itself uses `AxumSink`.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Vec<SinkCall>,
    status: Option<StatusCode>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    pub fn is_untouched(&self) -> bool {
        self.calls.is_empty()
    }
}

impl ResponseSink for Recorder {
    type Written = Recorded;

    fn status(&mut self, status: StatusCode) -> &mut Self {
        self.calls.push(SinkCall::Status(status));
        self.status = Some(status);
        self
    }

    fn json(&mut self, body: Value) -> Recorded {
        self.calls.push(SinkCall::Json(body.clone()));
        Recorded {
            status: self.status,
            body,
        }
    }
}
