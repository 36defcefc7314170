//! Label tools: addLabel, removeLabel, getBoardLabels, createLabel.

use std::sync::Arc;

use reqwest::Method;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{BoardArguments, ToolDefinition, ToolFuture, confirmation, entity};
use crate::mcp::validation::TrelloId;
use crate::trello::TrelloApi;

/// Label colors Trello accepts. `null` creates a colorless label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Yellow,
    Purple,
    Blue,
    Red,
    Green,
    Orange,
    Black,
    Sky,
    Pink,
    Lime,
    Null,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardLabel {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    #[schemars(description = "Label ID")]
    pub label_id: TrelloId,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewLabel {
    #[schemars(description = "Board ID")]
    pub board_id: TrelloId,
    #[schemars(description = "Label name", length(min = 1, max = 16384))]
    pub name: String,
    #[schemars(description = "Label color")]
    pub color: LabelColor,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new("addLabel", "Add an existing label to a card", add_label::<C>),
        ToolDefinition::new("removeLabel", "Remove a label from a card", remove_label::<C>),
        ToolDefinition::new(
            "getBoardLabels",
            "Get the labels defined on a board",
            get_board_labels::<C>,
        ),
        ToolDefinition::new("createLabel", "Create a label on a board", create_label::<C>),
    ]
}

fn add_label<C: TrelloApi + 'static>(client: Arc<C>, args: CardLabel) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/idLabels", args.card_id);
        let body = json!({ "value": args.label_id });
        client.invoke(Method::POST, &path, Some(body)).await?;
        Ok(confirmation("Label added successfully"))
    })
}

fn remove_label<C: TrelloApi + 'static>(client: Arc<C>, args: CardLabel) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/idLabels/{}", args.card_id, args.label_id);
        client.invoke(Method::DELETE, &path, None).await?;
        Ok(confirmation("Label removed successfully"))
    })
}

fn get_board_labels<C: TrelloApi + 'static>(client: Arc<C>, args: BoardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/boards/{}/labels", args.board_id);
        let labels = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&labels))
    })
}

fn create_label<C: TrelloApi + 'static>(client: Arc<C>, args: NewLabel) -> ToolFuture {
    Box::pin(async move {
        let label = json!({
            "idBoard": args.board_id,
            "name": args.name,
            "color": args.color,
        });
        let created = client.invoke(Method::POST, "/labels", Some(label)).await?;
        Ok(entity(&created))
    })
}
