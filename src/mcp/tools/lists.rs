//! List tools: getLists, createList, archiveListCards.

use std::sync::Arc;

use reqwest::Method;
use rmcp::{schemars, schemars::JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use super::{
    BoardArguments, ListArguments, ToolDefinition, ToolFuture, body, confirmation, entity,
};
use crate::mcp::validation::TrelloId;
use crate::trello::TrelloApi;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewList {
    #[schemars(description = "Board ID")]
    pub board_id: TrelloId,
    #[schemars(description = "List name", length(min = 1, max = 16384))]
    pub name: String,
    #[schemars(
        description = "Position: top, bottom or a positive number",
        length(max = 256)
    )]
    pub pos: Option<String>,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new("getLists", "Get the lists of a board", get_lists::<C>),
        ToolDefinition::new("createList", "Create a list on a board", create_list::<C>),
        ToolDefinition::new(
            "archiveListCards",
            "Archive every card in a list",
            archive_list_cards::<C>,
        ),
    ]
}

fn get_lists<C: TrelloApi + 'static>(client: Arc<C>, args: BoardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/boards/{}/lists", args.board_id);
        let lists = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&lists))
    })
}

fn create_list<C: TrelloApi + 'static>(client: Arc<C>, args: NewList) -> ToolFuture {
    Box::pin(async move {
        let list = body([
            ("idBoard", Some(Value::from(args.board_id))),
            ("name", Some(Value::from(args.name))),
            ("pos", args.pos.map(Value::from)),
        ]);
        let created = client.invoke(Method::POST, "/lists", Some(list)).await?;
        Ok(entity(&created))
    })
}

fn archive_list_cards<C: TrelloApi + 'static>(client: Arc<C>, args: ListArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/lists/{}/archiveAllCards", args.list_id);
        client.invoke(Method::POST, &path, None).await?;
        Ok(confirmation("All cards archived successfully"))
    })
}
