use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs every request with a generated request id, its matched route,
/// status and latency. The id is echoed back in `x-request-id`.
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_owned())
        .unwrap_or_else(|| "unknown".to_owned());
    let remote_addr = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let span = tracing::info_span!("request", request_id = %request_id, method = %method, path = %matched_path);

    tracing::debug!(
        parent: &span,
        uri = %uri,
        remote_addr = %remote_addr,
        "incoming request"
    );

    let mut response = next.run(req).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    match status {
        500..=599 => tracing::error!(parent: &span, status, duration_ms, "request completed (server error)"),
        400..=499 => tracing::warn!(parent: &span, status, duration_ms, "request completed (client error)"),
        _ => tracing::info!(parent: &span, status, duration_ms, "request completed"),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
