//! Conversation item (message, note, event, form submission) models.

use helpdesk_core::item::ItemType;
use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `conversation_items` table.
///
/// Exactly one of `body_text` / `body_json` is set, depending on the type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationItem {
    pub id: DbId,
    pub conversation_id: DbId,
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub item_type: String,
    pub author_id: Option<DbId>,
    pub body_text: Option<String>,
    pub body_json: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending an item. `body` is a string for messages and notes
/// and an object for events and form submissions.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub body: serde_json::Value,
}

/// Query parameters for the paged item feed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFeedParams {
    /// Return items older than this item id.
    pub before: Option<DbId>,
    pub limit: Option<i64>,
}

/// One page of the item feed, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub items: Vec<ConversationItem>,
    pub has_more: bool,
    /// Cursor for the next (older) page.
    pub next_before: Option<DbId>,
}
