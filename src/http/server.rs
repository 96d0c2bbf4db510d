//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Turn requests into service results and write them through the adapter
//! - Forward requests to the upstream service
//!
//! # Routes
//! - `GET /health`: plain success result
//! - `POST /results`: writes a posted result descriptor
//! - `ANY /forward/{*path}`: relays to the upstream, writes its JSON body

use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    error_handling::HandleErrorLayer,
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap, HeaderName},
    response::Response,
    routing::{any, get, post},
    BoxError, Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;

use crate::adapter::{ForwardedResponse, ResultDescriptor, ServiceResult};
use crate::config::GatewayConfig;
use crate::http::request::{request_id, UuidRequestId};
use crate::http::response::respond;
use crate::lifecycle::shutdown;
use crate::observability::metrics;

/// Prefix of the forwarding route, stripped before joining onto the upstream.
const FORWARD_PREFIX: &str = "/forward/";

/// Headers that must not be relayed: hop-by-hop ones, plus `Accept-Encoding`
/// since upstream bodies are decoded as plain JSON.
const NOT_FORWARDED: [HeaderName; 8] = [
    header::HOST,
    header::ACCEPT_ENCODING,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

/// Errors building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream: Url,
    pub max_body_bytes: usize,
}

/// HTTP gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .build()?;

        // Join keeps the last path segment only when the base ends with '/'.
        let mut base = config.upstream.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let state = AppState {
            client,
            upstream: Url::parse(&base)?,
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/results", post(results_handler))
            .route("/forward/{*path}", any(forward_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.limits.request_timeout_secs,
                    ))),
            )
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Middleware failures get the same `{ "errors": [...] }` envelope as handlers.
async fn handle_middleware_error(err: BoxError) -> Response {
    let result = if err.is::<Elapsed>() {
        ResultDescriptor::failure("request timed out").with_status(408)
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ResultDescriptor::failure("internal server error").with_status(500)
    };
    respond(result.into()).await
}

async fn health_handler() -> Response {
    let start = Instant::now();
    let result = ResultDescriptor::success()
        .with_field("service", env!("CARGO_PKG_NAME"))
        .with_field("version", env!("CARGO_PKG_VERSION"));

    let response = respond(result.into()).await;
    metrics::record_request("health", response.status().as_u16(), start);
    response
}

/// Writes a descriptor posted by a service; malformed bodies become failures.
async fn results_handler(payload: Result<Json<ResultDescriptor>, JsonRejection>) -> Response {
    let start = Instant::now();
    let descriptor = match payload {
        Ok(Json(descriptor)) => descriptor,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected result descriptor");
            ResultDescriptor::failure(rejection.body_text()).with_status(rejection.status().as_u16())
        }
    };

    let response = respond(descriptor.into()).await;
    metrics::record_request("results", response.status().as_u16(), start);
    response
}

async fn forward_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers()).to_string();

    let result = forward(&state, request, &request_id).await;

    let response = respond(result).await;
    tracing::debug!(
        request_id = %request_id,
        status = %response.status(),
        "Forwarded response written"
    );
    metrics::record_request("forward", response.status().as_u16(), start);
    response
}

/// Relay `request` to the upstream and wrap whatever comes back.
///
/// The upstream path comes from the raw request URI so percent-encoded
/// `?`, `#` and `/` stay encoded.
async fn forward(state: &AppState, request: Request, request_id: &str) -> ServiceResult {
    let (parts, body) = request.into_parts();
    let path = parts
        .uri
        .path()
        .strip_prefix(FORWARD_PREFIX)
        .unwrap_or_default();

    let mut url = match state.upstream.join(path) {
        Ok(url) if url.as_str().starts_with(state.upstream.as_str()) => url,
        _ => {
            tracing::warn!(request_id = %request_id, path = %path, "Rejected forward path");
            return ResultDescriptor::failure("invalid forward path").with_status(400).into();
        }
    };
    url.set_query(parts.uri.query());

    let body: Bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to buffer request body");
            return ResultDescriptor::failure("request body too large").with_status(413).into();
        }
    };

    let mut headers: HeaderMap = parts.headers;
    for name in NOT_FORWARDED {
        headers.remove(&name);
    }

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        upstream = %url,
        "Forwarding request"
    );

    match state
        .client
        .request(parts.method, url)
        .headers(headers)
        .body(body)
        .send()
        .await
    {
        Ok(response) => ForwardedResponse::from_upstream(response).into(),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream request failed");
            ResultDescriptor::failure("upstream request failed").with_status(502).into()
        }
    }
}
