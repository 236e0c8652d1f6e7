//! Axum middleware for request spans and access logging.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Header carrying the request id, read from the client or generated.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("numeric segment regex is valid"));

/// Replace numeric path segments with `:id` to keep route labels bounded.
fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/:id$1").into_owned()
}

/// Reuse the client's request id when it sent one, otherwise mint a UUIDv7.
fn request_id(request: &Request) -> HeaderValue {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty())
        .cloned()
        .or_else(|| HeaderValue::from_str(&Uuid::now_v7().to_string()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("unknown"))
}

/// Wraps every request in an `http_request` span, logs its outcome and
/// echoes the request id back on the response.
pub async fn observability_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = normalize_path(&path);
    let request_id = request_id(&request);
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    request.headers_mut().insert(header.clone(), request_id.clone());

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.route = %route,
        request_id = request_id.to_str().unwrap_or("-"),
    );

    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let duration = start.elapsed();
    span.in_scope(|| {
        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                duration_ms = duration.as_millis() as u64,
                "Request failed"
            );
        } else {
            tracing::info!(
                status = status.as_u16(),
                duration_ms = duration.as_millis() as u64,
                "Request completed"
            );
        }
    });

    response.headers_mut().insert(header, request_id);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric_id() {
        assert_eq!(normalize_path("/api/v1/ethics/12345"), "/api/v1/ethics/:id");
    }

    #[test]
    fn test_normalize_path_keeps_names() {
        assert_eq!(normalize_path("/api/v1/agents/a1"), "/api/v1/agents/a1");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }

    #[test]
    fn test_normalize_path_trailing_slash() {
        assert_eq!(normalize_path("/api/v1/scaling/7/"), "/api/v1/scaling/:id/");
    }
}
