//! Result descriptors produced by the service layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::adapter::forwarded::ForwardedResponse;

/// Success/failure envelope returned by a service call.
///
/// Anything besides `ok`, `status` and `reason` is opaque payload and is
/// flattened back next to them on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDescriptor {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ResultDescriptor {
    /// A successful result with no status and no payload.
    pub fn success() -> Self {
        Self {
            ok: true,
            status: None,
            reason: None,
            payload: Map::new(),
        }
    }

    /// A failed result carrying a human-readable reason.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            reason: Some(reason.into()),
            payload: Map::new(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach an opaque payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// Outcome of a service-layer operation, as seen by the adapter.
#[derive(Debug)]
pub enum ServiceResult {
    /// A descriptor written out as-is on success.
    Plain(ResultDescriptor),
    /// An upstream HTTP response whose body must be resolved before writing.
    Forwarded(ForwardedResponse),
}

impl ServiceResult {
    pub fn is_ok(&self) -> bool {
        match self {
            ServiceResult::Plain(descriptor) => descriptor.ok,
            ServiceResult::Forwarded(forwarded) => forwarded.is_ok(),
        }
    }

    /// Explicit status, if the result carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceResult::Plain(descriptor) => descriptor.status,
            ServiceResult::Forwarded(forwarded) => Some(forwarded.status().as_u16()),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ServiceResult::Plain(descriptor) => descriptor.reason.as_deref(),
            ServiceResult::Forwarded(forwarded) => forwarded.reason(),
        }
    }

    pub fn into_plain(self) -> Option<ResultDescriptor> {
        match self {
            ServiceResult::Plain(descriptor) => Some(descriptor),
            ServiceResult::Forwarded(_) => None,
        }
    }
}

impl From<ResultDescriptor> for ServiceResult {
    fn from(descriptor: ResultDescriptor) -> Self {
        ServiceResult::Plain(descriptor)
    }
}

impl From<ForwardedResponse> for ServiceResult {
    fn from(forwarded: ForwardedResponse) -> Self {
        ServiceResult::Forwarded(forwarded)
    }
}
