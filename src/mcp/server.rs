//! MCP server handler
//!
//! [`TrelloServer`] answers `tools/list` from the tool registry and routes
//! `tools/call` through it. One instance is created per MCP session; the
//! registry is built once at that point and shared by every call in the
//! session.

use std::future::Future;
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};

use super::tools::ToolRegistry;
use super::validation::JsonObject;
use crate::trello::TrelloApi;

/// MCP server over a Trello client.
///
/// Generic over `C: TrelloApi` so tests can substitute a mock client.
pub struct TrelloServer<C> {
    client: Arc<C>,
    registry: Arc<ToolRegistry<C>>,
}

impl<C> Clone for TrelloServer<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<C: TrelloApi + 'static> TrelloServer<C> {
    /// Create a server handler for one MCP session.
    ///
    /// Builds the full tool registry, compiling every tool's input schema,
    /// and binds it to `client`. Every tool call made through this handler
    /// and its clones goes to the same client.
    ///
    /// # Arguments
    /// * `client` - Trello capability shared with every other session
    ///
    /// # Returns
    /// A handler advertising the 28 Trello tools
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            registry: Arc::new(ToolRegistry::new()),
        }
    }

    /// Tool descriptors in catalog order.
    pub fn tool_list(&self) -> Vec<Tool> {
        self.registry
            .tools()
            .iter()
            .map(|tool| {
                Tool::new(tool.name, tool.description, tool.schema())
            })
            .collect()
    }

    /// Run one tool call and map failures onto the protocol.
    pub async fn invoke_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        match self.registry.call(&self.client, name, arguments).await {
            Ok(result) => Ok(result),
            Err(e) => e.into_response(),
        }
    }
}

impl<C: TrelloApi + 'static> ServerHandler for TrelloServer<C> {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.instructions = Some(
            "Trello MCP gateway - manage boards, lists, cards, comments, labels, members and checklists"
                .to_string(),
        );
        info
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tool_list())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { self.invoke_tool(&request.name, request.arguments).await }
    }
}
