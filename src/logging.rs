use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Wraps each request in a span so service-level events carry method and path.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("request", method = %method, path = %path);
    let started_at = Instant::now();

    let response = next.run(request).instrument(span.clone()).await;
    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request summary");

        if status.as_u16() == 401 {
            warn!("measure mutation rejected: missing or invalid capability token");
        } else if status.is_server_error() {
            warn!(status = status.as_u16(), "measure request failed");
        }
    });

    response
}
