//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (assign / propagate X-Request-ID)
//!     → handler builds a ServiceResult (plain or forwarded)
//!     → response.rs (AxumSink + adapter)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use response::{respond, AxumSink};
pub use server::{HttpServer, ServerError};
