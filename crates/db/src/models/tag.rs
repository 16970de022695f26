//! Conversation tags.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// `(conversation_id, tag_id)` pair used when loading tags for many
/// conversations at once.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationTagLink {
    pub conversation_id: DbId,
    pub tag_id: DbId,
}

/// DTO for attaching tags by name. Unknown names are created.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachTagsRequest {
    pub tag_names: Vec<String>,
}
