//! Conversation status catalog models and DTOs.

use helpdesk_core::status::StatusCategory;
use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `conversation_statuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationStatus {
    pub id: DbId,
    pub label: String,
    /// Raw category value; see [`helpdesk_core::status`].
    pub category: i16,
    pub active: bool,
    pub is_default: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a status.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationStatus {
    pub label: String,
    pub category: StatusCategory,
    pub active: Option<bool>,
    pub is_default: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a status. A category change is refused while any
/// conversation still references the status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConversationStatus {
    pub label: Option<String>,
    pub category: Option<StatusCategory>,
    pub active: Option<bool>,
    pub is_default: Option<bool>,
    pub sort_order: Option<i32>,
}
