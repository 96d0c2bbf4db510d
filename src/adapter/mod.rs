//! Service result → HTTP response adaptation.
//!
//! # Data Flow
//! ```text
//! service layer
//!     → ServiceResult (Plain descriptor or Forwarded upstream response)
//!     → adapt.rs (failure / passthrough / success branch)
//!     → forwarded.rs (resolve nested body, only for Forwarded)
//!     → ResponseSink (status, then JSON body)
//! ```
//!
//! # Design Decisions
//! - Dispatch on the `ServiceResult` variant, never on field presence
//! - Domain failures are written, mechanical failures are returned as `Err`
//! - The sink is untouched whenever an `Err` is returned

pub mod adapt;
pub mod error;
pub mod forwarded;
pub mod result;
pub mod sink;

pub use adapt::{adapt, adapt_with, write, AdaptOptions, Adapted};
pub use error::{AdapterError, ResolveError};
pub use forwarded::{ForwardedResponse, ResolveBody, UpstreamBody};
pub use result::{ResultDescriptor, ServiceResult};
pub use sink::{Recorded, Recorder, ResponseSink, SinkCall};
