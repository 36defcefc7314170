//! Member tools: card membership, board members and the current user.

use std::sync::Arc;

use reqwest::Method;
use rmcp::{schemars, schemars::JsonSchema};
use serde::Deserialize;
use serde_json::json;

use super::{BoardArguments, NoArguments, ToolDefinition, ToolFuture, confirmation, entity};
use crate::mcp::validation::TrelloId;
use crate::trello::TrelloApi;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardMember {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    #[schemars(description = "Member ID")]
    pub member_id: TrelloId,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new(
            "addMemberToCard",
            "Assign a member to a card",
            add_member_to_card::<C>,
        ),
        ToolDefinition::new(
            "removeMemberFromCard",
            "Unassign a member from a card",
            remove_member_from_card::<C>,
        ),
        ToolDefinition::new(
            "getBoardMembers",
            "Get the members of a board",
            get_board_members::<C>,
        ),
        ToolDefinition::new(
            "getCurrentUser",
            "Get the authenticated member",
            get_current_user::<C>,
        ),
    ]
}

fn add_member_to_card<C: TrelloApi + 'static>(client: Arc<C>, args: CardMember) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/idMembers", args.card_id);
        let body = json!({ "value": args.member_id });
        client.invoke(Method::POST, &path, Some(body)).await?;
        Ok(confirmation("Member added successfully"))
    })
}

fn remove_member_from_card<C: TrelloApi + 'static>(
    client: Arc<C>,
    args: CardMember,
) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/idMembers/{}", args.card_id, args.member_id);
        client.invoke(Method::DELETE, &path, None).await?;
        Ok(confirmation("Member removed successfully"))
    })
}

fn get_board_members<C: TrelloApi + 'static>(client: Arc<C>, args: BoardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/boards/{}/members", args.board_id);
        let members = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&members))
    })
}

fn get_current_user<C: TrelloApi + 'static>(client: Arc<C>, _args: NoArguments) -> ToolFuture {
    Box::pin(async move {
        let member = client.invoke(Method::GET, "/members/me", None).await?;
        Ok(entity(&member))
    })
}
