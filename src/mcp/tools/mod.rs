//! MCP tool catalog
//!
//! Each entity module contributes its [`ToolDefinition`]s: a name, a
//! description and a handler taking a typed parameter struct. The struct's
//! derived schema is what `tools/list` advertises and what arguments are
//! validated against. Handlers are plain functions over an explicit
//! [`TrelloApi`] capability, so tests can drive them with a mock client.
//!
//! Result shapes are part of the contract: reads and writes that yield an
//! entity return it as compact JSON text, while deletes, attach/detach and
//! bulk archive return a fixed confirmation sentence.

mod boards;
mod cards;
mod checklists;
mod comments;
mod labels;
mod lists;
mod members;

#[cfg(test)]
pub(crate) mod test_support;


use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rmcp::{
    model::{CallToolResult, Content},
    schemars,
    schemars::JsonSchema,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::ToolError;
use super::validation::{
    ArgumentValidator, JsonObject, SchemaError, TrelloId, ValidationError, input_schema,
};
use crate::trello::TrelloApi;

/// Future returned by a tool handler.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send>>;

/// Handler of a tool taking parameters `P`.
pub type ToolHandler<C, P> = fn(Arc<C>, P) -> ToolFuture;

type Dispatch<C> =
    Box<dyn Fn(Arc<C>, Value) -> Result<ToolFuture, serde_json::Error> + Send + Sync>;

/// One callable tool.
pub struct ToolDefinition<C> {
    pub name: &'static str,
    pub description: &'static str,
    schema: Arc<JsonObject>,
    validator: Result<ArgumentValidator, SchemaError>,
    dispatch: Dispatch<C>,
}

impl<C: TrelloApi + 'static> ToolDefinition<C> {
    /// Define a tool whose arguments are described by `P`.
    pub fn new<P>(
        name: &'static str,
        description: &'static str,
        handler: ToolHandler<C, P>,
    ) -> Self
    where
        P: DeserializeOwned + JsonSchema + 'static,
    {
        let schema = input_schema::<P>();
        let validator = ArgumentValidator::compile(name, &schema);
        let dispatch: Dispatch<C> = Box::new(
            move |client: Arc<C>, arguments: Value| -> Result<ToolFuture, serde_json::Error> {
                let params = serde_json::from_value::<P>(arguments)?;
                Ok(handler(client, params))
            },
        );
        Self {
            name,
            description,
            schema: Arc::new(schema),
            validator,
            dispatch,
        }
    }
}

impl<C> ToolDefinition<C> {
    /// JSON Schema of the tool's arguments.
    pub fn schema(&self) -> Arc<JsonObject> {
        Arc::clone(&self.schema)
    }

    pub fn validator(&self) -> Result<&ArgumentValidator, SchemaError> {
        self.validator.as_ref().map_err(Clone::clone)
    }
}

/// Ordered collection of tools with unique names.
pub struct ToolRegistry<C> {
    tools: Vec<ToolDefinition<C>>,
}

impl<C: TrelloApi + 'static> ToolRegistry<C> {
    /// Registry holding the full Trello catalog.
    pub fn new() -> Self {
        let mut registry = Self { tools: Vec::new() };
        for tool in boards::definitions()
            .into_iter()
            .chain(lists::definitions())
            .chain(cards::definitions())
            .chain(comments::definitions())
            .chain(labels::definitions())
            .chain(members::definitions())
            .chain(checklists::definitions())
        {
            registry.register(tool);
        }
        registry
    }

    fn register(&mut self, tool: ToolDefinition<C>) {
        debug_assert!(
            self.get(tool.name).is_none(),
            "duplicate tool name {}",
            tool.name
        );
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition<C>> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn tools(&self) -> &[ToolDefinition<C>] {
        &self.tools
    }

    /// Validate `arguments` and run the named tool.
    ///
    /// Nothing reaches `client` unless validation succeeds.
    pub async fn call(
        &self,
        client: &Arc<C>,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "Unknown tool requested");
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            });
        };

        let arguments = Value::Object(arguments.unwrap_or_default());
        tool.validator()?.validate(&arguments).inspect_err(|e| {
            info!(tool = tool.name, violations = e.violations.len(), "Rejected tool arguments");
        })?;
        let pending = (tool.dispatch)(Arc::clone(client), arguments)
            .map_err(|e| ValidationError::malformed(tool.name, &e))?;

        debug!(tool = tool.name, "Invoking tool");
        let result = pending.await;
        match &result {
            Ok(_) => debug!(tool = tool.name, "Tool completed"),
            Err(e) => warn!(tool = tool.name, error = %e, "Tool failed"),
        }
        result
    }
}

impl<C: TrelloApi + 'static> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments of a tool that takes none.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NoArguments {}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BoardArguments {
    #[schemars(description = "Board ID")]
    pub board_id: TrelloId,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListArguments {
    #[schemars(description = "List ID")]
    pub list_id: TrelloId,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardArguments {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
}

/// Request body holding only the fields that are present.
fn body<const N: usize>(fields: [(&'static str, Option<Value>); N]) -> Value {
    Value::Object(
        fields
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| (field.to_string(), value)))
            .collect(),
    )
}

/// Result carrying a remote entity (or list of entities) as JSON text,
/// keys in the order the remote sent them.
fn entity(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(value.to_string())])
}

/// Result carrying a fixed confirmation sentence.
fn confirmation(text: &'static str) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}
