//! Card tools.
//!
//! Covers reading cards per list or board, the card lifecycle (create,
//! update, move, delete), full-text search and URL attachments.

use std::borrow::Cow;
use std::sync::Arc;

use reqwest::Method;
use rmcp::schemars::{self, JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::Deserialize;
use serde_json::{Number, Value};
use url::form_urlencoded;

use super::{
    BoardArguments, CardArguments, ListArguments, ToolDefinition, ToolFuture, body, confirmation,
    entity,
};
use crate::mcp::validation::TrelloId;
use crate::trello::TrelloApi;

/// Card position: `top`, `bottom` or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Position {
    Named(String),
    Index(Number),
}

impl From<Position> for Value {
    fn from(pos: Position) -> Self {
        match pos {
            Position::Named(name) => Value::String(name),
            Position::Index(index) => Value::Number(index),
        }
    }
}

impl JsonSchema for Position {
    fn schema_name() -> Cow<'static, str> {
        "Position".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "anyOf": [
                { "type": "string", "maxLength": 256 },
                { "type": "number" },
            ]
        })
    }
}

/// Upper bound on search results. Integral floats such as `5.0` count as
/// integers.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
pub struct SearchLimit(f64);

impl SearchLimit {
    /// Bounded to 1..=1000 by the schema.
    fn get(self) -> u32 {
        self.0 as u32
    }
}

impl JsonSchema for SearchLimit {
    fn schema_name() -> Cow<'static, str> {
        "SearchLimit".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "integer",
            "minimum": 1,
            "maximum": 1000,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCard {
    #[schemars(description = "List ID")]
    pub list_id: TrelloId,
    #[schemars(description = "Card name", length(min = 1, max = 16384))]
    pub name: String,
    #[schemars(description = "Card description", length(max = 16384))]
    pub desc: Option<String>,
    #[schemars(description = "Due date (ISO 8601)", length(max = 256))]
    pub due: Option<String>,
    #[schemars(
        description = "Position: top, bottom or a positive number",
        length(max = 256)
    )]
    pub pos: Option<String>,
}

/// Fields of a card that `updateCard` may change.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CardPatch {
    #[schemars(description = "New card name", length(min = 1, max = 16384))]
    pub name: Option<String>,
    #[schemars(description = "New description", length(max = 16384))]
    pub desc: Option<String>,
    #[schemars(description = "Due date (ISO 8601)", length(max = 256))]
    pub due: Option<String>,
    #[schemars(description = "Archive (true) or unarchive (false)")]
    pub closed: Option<bool>,
    #[schemars(description = "Position: top, bottom or a positive number")]
    pub pos: Option<Position>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardUpdate {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    #[schemars(description = "Fields to change")]
    pub updates: CardPatch,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardMove {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    #[schemars(description = "Destination list ID")]
    pub list_id: TrelloId,
    #[schemars(
        description = "Position: top, bottom or a positive number",
        length(max = 256)
    )]
    pub pos: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CardSearch {
    #[schemars(description = "Search query", length(min = 1, max = 16384))]
    pub query: String,
    #[schemars(description = "Maximum number of cards to return")]
    pub limit: Option<SearchLimit>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UrlAttachment {
    #[schemars(description = "Card ID")]
    pub card_id: TrelloId,
    // Absolute, with a host, http or https only.
    #[schemars(
        description = "http(s) URL to attach",
        regex(pattern = r"^[Hh][Tt][Tt][Pp][Ss]?://[^\s/?#]+\S*$")
    )]
    pub url: String,
    #[schemars(description = "Attachment name", length(max = 256))]
    pub name: Option<String>,
}

pub(super) fn definitions<C: TrelloApi + 'static>() -> Vec<ToolDefinition<C>> {
    vec![
        ToolDefinition::new("getCards", "Get the cards in a list", get_cards::<C>),
        ToolDefinition::new(
            "getBoardCards",
            "Get all cards on a board",
            get_board_cards::<C>,
        ),
        ToolDefinition::new("getCard", "Get a card by ID", get_card::<C>),
        ToolDefinition::new("createCard", "Create a card in a list", create_card::<C>),
        ToolDefinition::new(
            "updateCard",
            "Update any of a card's name, description, due date, archived state or position",
            update_card::<C>,
        ),
        ToolDefinition::new("moveCard", "Move a card to another list", move_card::<C>),
        ToolDefinition::new("deleteCard", "Delete a card permanently", delete_card::<C>),
        ToolDefinition::new(
            "searchCards",
            "Search cards across all boards",
            search_cards::<C>,
        ),
        ToolDefinition::new(
            "attachUrlToCard",
            "Attach an http(s) URL to a card",
            attach_url_to_card::<C>,
        ),
    ]
}

fn get_cards<C: TrelloApi + 'static>(client: Arc<C>, args: ListArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/lists/{}/cards", args.list_id);
        let cards = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&cards))
    })
}

fn get_board_cards<C: TrelloApi + 'static>(client: Arc<C>, args: BoardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/boards/{}/cards", args.board_id);
        let cards = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&cards))
    })
}

fn get_card<C: TrelloApi + 'static>(client: Arc<C>, args: CardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}", args.card_id);
        let card = client.invoke(Method::GET, &path, None).await?;
        Ok(entity(&card))
    })
}

fn create_card<C: TrelloApi + 'static>(client: Arc<C>, args: NewCard) -> ToolFuture {
    Box::pin(async move {
        let card = body([
            ("idList", Some(Value::from(args.list_id))),
            ("name", Some(Value::from(args.name))),
            ("desc", args.desc.map(Value::from)),
            ("due", args.due.map(Value::from)),
            ("pos", args.pos.map(Value::from)),
        ]);
        let created = client.invoke(Method::POST, "/cards", Some(card)).await?;
        Ok(entity(&created))
    })
}

fn update_card<C: TrelloApi + 'static>(client: Arc<C>, args: CardUpdate) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}", args.card_id);
        let patch = args.updates;
        let changes = body([
            ("name", patch.name.map(Value::from)),
            ("desc", patch.desc.map(Value::from)),
            ("due", patch.due.map(Value::from)),
            ("closed", patch.closed.map(Value::from)),
            ("pos", patch.pos.map(Value::from)),
        ]);
        let card = client.invoke(Method::PUT, &path, Some(changes)).await?;
        Ok(entity(&card))
    })
}

fn move_card<C: TrelloApi + 'static>(client: Arc<C>, args: CardMove) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}", args.card_id);
        let destination = body([
            ("idList", Some(Value::from(args.list_id))),
            ("pos", args.pos.map(Value::from)),
        ]);
        let card = client.invoke(Method::PUT, &path, Some(destination)).await?;
        Ok(entity(&card))
    })
}

fn delete_card<C: TrelloApi + 'static>(client: Arc<C>, args: CardArguments) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}", args.card_id);
        client.invoke(Method::DELETE, &path, None).await?;
        Ok(confirmation("Card deleted successfully"))
    })
}

/// Path and query of a card search.
fn search_path(query: &str, limit: Option<u32>) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    params
        .append_pair("query", query)
        .append_pair("modelTypes", "cards")
        .append_pair("partial", "true");
    if let Some(limit) = limit {
        params.append_pair("cards_limit", &limit.to_string());
    }
    format!("/search?{}", params.finish())
}

fn search_cards<C: TrelloApi + 'static>(client: Arc<C>, args: CardSearch) -> ToolFuture {
    Box::pin(async move {
        let path = search_path(&args.query, args.limit.map(SearchLimit::get));
        let mut result = client.invoke(Method::GET, &path, None).await?;
        // Only the cards are returned, not the whole search envelope.
        let cards = result
            .get_mut("cards")
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(Vec::new()));
        Ok(entity(&cards))
    })
}

fn attach_url_to_card<C: TrelloApi + 'static>(client: Arc<C>, args: UrlAttachment) -> ToolFuture {
    Box::pin(async move {
        let path = format!("/cards/{}/attachments", args.card_id);
        let attachment = body([
            ("url", Some(Value::from(args.url))),
            ("name", args.name.map(Value::from)),
        ]);
        let created = client.invoke(Method::POST, &path, Some(attachment)).await?;
        Ok(entity(&created))
    })
}
