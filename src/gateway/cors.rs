//! CORS headers for preflight and `/mcp` responses.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

pub(crate) const NO_CACHE: HeaderValue = HeaderValue::from_static("no-cache, no-transform");
pub(crate) const ANY_ORIGIN: HeaderValue = HeaderValue::from_static("*");

/// Empty 200 with permissive CORS headers. The request `Origin` is echoed
/// when present.
pub(crate) fn preflight(request_headers: &HeaderMap) -> Response {
    let origin = request_headers
        .get(header::ORIGIN)
        .cloned()
        .unwrap_or(ANY_ORIGIN);
    let headers: [(HeaderName, HeaderValue); 5] = [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, origin),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ),
        (header::CACHE_CONTROL, NO_CACHE),
    ];
    (StatusCode::OK, headers).into_response()
}
