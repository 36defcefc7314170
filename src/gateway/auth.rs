//! Shared-secret authentication.

use std::hint::black_box;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::cors;

const SECRET_PARAM: &str = "secret";
const BEARER_PREFIX: &str = "Bearer ";

/// Secret presented by the caller: the `secret` query parameter when
/// present and non-empty, else an `Authorization: Bearer` token.
pub(crate) fn extract_secret(query: Option<&str>, headers: &HeaderMap) -> Option<String> {
    let from_query = query.and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == SECRET_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    });
    from_query.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Compare two byte strings without short-circuiting on the first
/// mismatch. Only a length difference returns early.
pub fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    let diff = expected
        .iter()
        .zip(provided)
        .fold(0u8, |acc, (a, b)| acc | black_box(a ^ b));
    black_box(diff) == 0
}

/// Authenticate every request, then answer preflights.
pub(crate) async fn front_door(
    State(secret): State<Option<Arc<str>>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = extract_secret(request.uri().query(), request.headers());
    let authorized = match (secret.as_deref(), provided) {
        (Some(expected), Some(provided)) => {
            constant_time_eq(expected.as_bytes(), provided.as_bytes())
        }
        _ => false,
    };

    if !authorized {
        warn!(method = %request.method(), path = request.uri().path(), "Rejected unauthenticated request");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    if request.method() == Method::OPTIONS {
        debug!(path = request.uri().path(), "Answering preflight");
        return cors::preflight(request.headers());
    }

    next.run(request).await
}
