//! Access logging middleware.
//!
//! Logs every request with method, path, response status and latency.
//! Form values never reach the log: only the path is recorded.

use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_access(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(%method, path, status, latency_ms, "Request failed");
    } else {
        tracing::debug!(%method, path, status, latency_ms, "Request served");
    }

    response
}
