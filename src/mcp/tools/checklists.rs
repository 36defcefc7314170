//! Checklist tools: createChecklist, addChecklistItem, getCardChecklists.

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
pub struct NewChecklist {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    #[schemars(description = "Checklist name", length(min = 1, max = 16384))]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewChecklistItem {
    #[schemars(description = "Checklist ID")]
    pub checklist_id: TrelloId,
    #[schemars(description = "Item name", length(min = 1, max = 16384))]
    pub name: String,
    #[schemars(description = "Create the item already checked")]
    pub checked: Option<bool>,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new(
            "createChecklist",
            "Create a checklist on a card",
            create_checklist::<C>,
        ),
        ToolDefinition::new(
            "addChecklistItem",
            "Add an item to a checklist",
            add_checklist_item::<C>,
        ),
        ToolDefinition::new(
            "getCardChecklists",
            "Get the checklists of a card",
            get_card_checklists::<C>,
        ),
    ]
}

fn create_checklist<C: TrelloApi + 'static>(client: Arc<C>, args: NewChecklist) -> ToolFuture {
    Box::pin(async move {
        let body = json!({ "idCard": args.card_id, "name": args.name });
        let checklist = client.invoke(Method::POST, "/checklists", Some(body)).await?;
        Ok(entity(&checklist))
    })
}

fn add_checklist_item<C: TrelloApi + 'static>(
    client: Arc<C>,
    args: NewChecklistItem,
) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/checklists/{}/checkItems", args.checklist_id);
        // Trello expects the flag as a string.
        let checked = if args.checked.unwrap_or(false) {
            "true"
        } else {
            "false"
        };
        let body = json!({ "name": args.name, "checked": checked });
        let item = client.invoke(Method::POST, &path, Some(body)).await?;
        Ok(entity(&item))
    })
}

fn get_card_checklists<C: TrelloApi + 'static>(client: Arc<C>, args: CardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/checklists", args.card_id);
        let checklists = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&checklists))
    })
}
