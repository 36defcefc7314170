//! Gateway route configuration.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Query, State},
    http::{Method, Request, StatusCode, Uri, header},
    middleware,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::Stream;
use rmcp::model::ClientJsonRpcMessage;
use serde::Deserialize;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::debug;

use super::auth;
use super::cors;
use super::state::AppState;
use crate::mcp::{MESSAGE_PATH, SessionError, TrelloServer, create_mcp_service};
use crate::trello::TrelloApi;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Create the gateway router.
///
/// Mounts the duplex transport at `/sse` and its message endpoint, and the
/// single-shot transport at exactly `/mcp`. Anything else falls through to
/// a 404, except a POST to a path ending in `/sse`, which answers 200.
///
/// Authentication wraps every route including the fallback, so an
/// unauthenticated request to an unknown path gets 401 rather than 404.
///
/// # Arguments
/// * `state` - Shared client, session table, shared secret and shutdown token
///
/// # Returns
/// The complete application router, with request tracing
pub fn create_router<C: TrelloApi + 'static>(state: AppState<C>) -> Router {
    let mcp_routes = Router::new()
        .route_service(
            "/mcp",
            create_mcp_service(state.client(), state.shutdown().child_token()),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            cors::ANY_ORIGIN,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            cors::NO_CACHE,
        ));

    let sse_routes = Router::new()
        .route("/sse", get(open_stream::<C>).post(connectivity_check))
        .route(MESSAGE_PATH, post(post_message::<C>))
        .with_state(state.clone());

    sse_routes
        .merge(mcp_routes)
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .layer(middleware::from_fn_with_state(
            state.shared_secret(),
            auth::front_door,
        ))
        .layer(
            // Path only: the query string may carry the shared secret
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::debug_span!(
                    "request",
                    method = %request.method(),
                    path = request.uri().path(),
                )
            }),
        )
}

async fn open_stream<C: TrelloApi + 'static>(
    State(state): State<AppState<C>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let server = TrelloServer::new(state.client());
    let (_, stream) = state
        .sessions()
        .open(server, state.shutdown().child_token());
    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

async fn post_message<C: TrelloApi + 'static>(
    State(state): State<AppState<C>>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing sessionId").into_response();
    };

    let message: ClientJsonRpcMessage = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            debug!(%session_id, error = %e, "Rejected malformed session message");
            return (StatusCode::BAD_REQUEST, "Invalid JSON-RPC message").into_response();
        }
    };

    match state.sessions().deliver(&session_id, message).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e @ (SessionError::NotFound | SessionError::Closed)) => {
            debug!(%session_id, error = %e, "Session message not delivered");
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

/// Some clients POST to the stream path before opening it.
async fn connectivity_check() -> StatusCode {
    StatusCode::OK
}

async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::POST && uri.path().ends_with("/sse") {
        return StatusCode::OK.into_response();
    }
    (StatusCode::NOT_FOUND, "Not found").into_response()
}
