//! Board tools: listBoards, getBoard, createBoard.

use std::sync::Arc;

use reqwest::Method;
use rmcp::{schemars, schemars::JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use super::{BoardArguments, NoArguments, ToolDefinition, ToolFuture, body, entity};
use crate::trello::TrelloApi;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewBoard {
    #[schemars(description = "Board name", length(min = 1, max = 16384))]
    pub name: String,
    #[schemars(description = "Board description", length(max = 16384))]
    pub desc: Option<String>,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new(
            "listBoards",
            "List all boards of the authenticated member",
            list_boards::<C>,
        ),
        ToolDefinition::new("getBoard", "Get a board by ID", get_board::<C>),
        ToolDefinition::new("createBoard", "Create a new board", create_board::<C>),
    ]
}

fn list_boards<C: TrelloApi + 'static>(client: Arc<C>, _args: NoArguments) -> ToolFuture {
    Box::pin(async move {
        let boards = client.invoke(Method::GET, "/members/me/boards", None).await?;
        Ok(entity(&boards))
    })
}

fn get_board<C: TrelloApi + 'static>(client: Arc<C>, args: BoardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/boards/{}", args.board_id);
        let board = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&board))
    })
}

fn create_board<C: TrelloApi + 'static>(client: Arc<C>, args: NewBoard) -> ToolFuture {
    Box::pin(async move {
        let board = body([
            ("name", Some(Value::from(args.name))),
            ("desc", args.desc.map(Value::from)),
        ]);
        let created = client.invoke(Method::POST, "/boards", Some(board)).await?;
        Ok(entity(&created))
    })
}
