//! Tool invocation errors and their MCP representation.

use miette::Diagnostic;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde_json::json;
use thiserror::Error;

use super::validation::{SchemaError, ValidationError};
use crate::trello::TrelloError;

/// Failure of a single tool call.
#[derive(Error, Diagnostic, Debug)]
pub enum ToolError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Remote(#[from] TrelloError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    #[error("Tool {name} not found")]
    #[diagnostic(code(trello_mcp::mcp::unknown_tool))]
    UnknownTool { name: String },
}

impl ToolError {
    /// Convert into the value returned to the MCP client.
    ///
    /// Validation and unknown-tool failures become protocol errors, as does
    /// a tool whose own schema does not compile. Remote
    /// failures become a tool result flagged `isError` whose text carries
    /// only the opaque remote error message.
    pub fn into_response(self) -> Result<CallToolResult, McpError> {
        match self {
            ToolError::Validation(err) => Err(McpError::invalid_params(
                err.to_string(),
                Some(json!({ "tool": err.tool, "violations": err.violations })),
            )),
            ToolError::UnknownTool { .. } => Err(McpError::invalid_params(self.to_string(), None)),
            ToolError::Schema(err) => Err(McpError::internal_error(err.to_string(), None)),
            ToolError::Remote(err) => Ok(CallToolResult::error(vec![Content::text(
                err.to_string(),
            )])),
        }
    }
}
