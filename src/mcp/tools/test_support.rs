//! Helpers for driving tools against a mocked Trello API.

use std::sync::Arc;

use reqwest::Method;
use rmcp::model::{CallToolResult, RawContent};
use serde_json::Value;

use crate::mcp::error::ToolError;
use crate::mcp::validation::JsonObject;
use crate::trello::{MockTrelloApi, TrelloResult};

/// Expect exactly one `method` call to `path` carrying `body`, answered
/// with `reply`.
pub(crate) fn expect_call(
    mock: &mut MockTrelloApi,
    method: Method,
    path: impl Into<String>,
    body: Option<Value>,
    reply: TrelloResult<Value>,
) {
    let path = path.into();
    mock.expect_invoke()
        .withf(move |m, p, b| *m == method && p == path && *b == body)
        .times(1)
        .return_once(move |_, _, _| reply);
}

/// A mock that fails the test on any remote call.
pub(crate) fn no_calls() -> MockTrelloApi {
    let mut mock = MockTrelloApi::new();
    mock.expect_invoke().never();
    mock
}

pub(crate) fn args(value: Value) -> Option<JsonObject> {
    match value {
        Value::Object(map) => Some(map),
        _ => panic!("tool arguments must be an object"),
    }
}

/// Text of the single content block of a tool result.
pub(crate) fn result_text(result: &CallToolResult) -> &str {
    assert_eq!(result.content.len(), 1, "expected one content block");
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    }
}

pub(crate) fn is_error(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

/// Run `name` through a fresh registry against `mock`.
pub(crate) async fn call(
    mock: MockTrelloApi,
    name: &str,
    arguments: Value,
) -> Result<CallToolResult, ToolError> {
    let client = Arc::new(mock);
    super::ToolRegistry::new()
        .call(&client, name, args(arguments))
        .await
}

pub(crate) const BOARD_ID: &str = "5f1a2b3c4d5e6f7a8b9c0d1e";
pub(crate) const LIST_ID: &str = "6a1b2c3d4e5f6a7b8c9d0e1f";
pub(crate) const CARD_ID: &str = "7b2c3d4e5f6a7b8c9d0e1f2a";
pub(crate) const LABEL_ID: &str = "8c3d4e5f6a7b8c9d0e1f2a3b";
pub(crate) const MEMBER_ID: &str = "9d4e5f6a7b8c9d0e1f2a3b4c";
pub(crate) const CHECKLIST_ID: &str = "0e5f6a7b8c9d0e1f2a3b4c5d";
