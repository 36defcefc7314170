//! Tests for the single-shot Streamable HTTP service

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use super::tools::test_support::{BOARD_ID, expect_call, no_calls};
use crate::trello::MockTrelloApi;

fn app(mock: MockTrelloApi) -> Router {
    Router::new().route_service(
        "/mcp",
        super::create_mcp_service(Arc::new(mock), CancellationToken::new()),
    )
}

fn rpc(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// First JSON-RPC envelope in a response body, which may be plain JSON or
/// an SSE stream of `data:` lines.
async fn envelope(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        return value;
    }
    text.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .find(|value| value.get("id").is_some())
        .unwrap_or_else(|| panic!("no JSON-RPC envelope in body: {text}"))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_only_mcp_is_mounted() {
    let response = app(no_calls())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tools_list_without_session() {
    let response = app(no_calls())
        .oneshot(rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = envelope(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 28);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tools_call_reaches_client() {
    let mut mock = MockTrelloApi::new();
    expect_call(
        &mut mock,
        Method::GET,
        format!("/boards/{BOARD_ID}"),
        None,
        Ok(json!({"id": BOARD_ID, "name": "Roadmap"})),
    );

    let response = app(mock)
        .oneshot(rpc(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "getBoard", "arguments": {"boardId": BOARD_ID}}
        })))
        .await
        .unwrap();

    let body = envelope(response).await;
    assert_eq!(body["id"], 7);
    assert_eq!(
        body["result"]["content"][0]["text"],
        r#"{"id":"5f1a2b3c4d5e6f7a8b9c0d1e","name":"Roadmap"}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_arguments_are_protocol_error() {
    let response = app(no_calls())
        .oneshot(rpc(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "getCard", "arguments": {"cardId": "short"}}
        })))
        .await
        .unwrap();

    let body = envelope(response).await;
    assert_eq!(body["error"]["code"], -32602);
    assert_eq!(body["error"]["data"]["violations"][0]["path"], "cardId");
}
