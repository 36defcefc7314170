//! Comment tools: addComment, getComments.

use std::sync::Arc;

use reqwest::Method;
use rmcp::{schemars, schemars::JsonSchema};
use serde::Deserialize;
use serde_json::json;

use super::{CardArguments, ToolDefinition, ToolFuture, entity};
use crate::mcp::validation::TrelloId;
use crate::trello::TrelloApi;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewComment {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    #[schemars(description = "Comment text", length(min = 1, max = 16384))]
    pub text: String,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new("addComment", "Add a comment to a card", add_comment::<C>),
        ToolDefinition::new(
            "getComments",
            "Get the comments on a card",
            get_comments::<C>,
        ),
    ]
}

fn add_comment<C: TrelloApi + 'static>(client: Arc<C>, args: NewComment) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/actions/comments", args.card_id);
        let comment = json!({ "text": args.text });
        let created = client.invoke(Method::POST, &path, Some(comment)).await?;
        Ok(entity(&created))
    })
}

fn get_comments<C: TrelloApi + 'static>(client: Arc<C>, args: CardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/actions?filter=commentCard", args.card_id);
        let comments = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&comments))
    })
}
