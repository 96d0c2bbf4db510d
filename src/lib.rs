//! Service result → HTTP response adapter, plus a small axum gateway built on it.

pub mod adapter;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use adapter::{adapt, adapt_with, write, AdaptOptions, Adapted, ResultDescriptor, ServiceResult};
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
