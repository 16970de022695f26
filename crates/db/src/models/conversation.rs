//! Conversation models and DTOs.

use helpdesk_core::attribute::Attribute;
use helpdesk_core::transition::StatusFieldsMut;
use helpdesk_core::types::{DbId, Timestamp};
use helpdesk_core::view::OrderDir;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::conversation_item::ConversationItem;
use super::user::{GroupSummary, UserSummary};

/// A row from the `conversations` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: DbId,
    pub subject: String,
    /// Customer who opened the conversation.
    pub user_id: Option<DbId>,
    pub status_id: DbId,
    /// Always the category of `status_id`.
    pub status_category: i16,
    pub assignee_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub closed_at: Option<Timestamp>,
    pub closed_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    /// Borrow the columns a status transition writes.
    pub fn status_fields_mut(&mut self) -> StatusFieldsMut<'_> {
        StatusFieldsMut {
            status_id: &mut self.status_id,
            status_category: &mut self.status_category,
            closed_at: &mut self.closed_at,
            closed_by: &mut self.closed_by,
        }
    }
}

/// A conversation with every relation the search projection reads.
///
/// Relations that could not be loaded are simply absent.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationWithRelations {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub user: Option<UserSummary>,
    pub group: Option<GroupSummary>,
    /// Message items in `created_at` order.
    pub messages: Vec<ConversationItem>,
    pub tag_ids: Vec<DbId>,
    pub attributes: Vec<Attribute>,
}

/// DTO for creating a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversation {
    pub subject: String,
    pub user_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    pub group_id: Option<DbId>,
    /// Defaults to the default status of the open category.
    pub status_id: Option<DbId>,
}

/// Body of `POST /conversations/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status_id: DbId,
    pub conversation_ids: Vec<DbId>,
}

/// Query parameters for `GET /conversations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationListParams {
    pub status_category: Option<i16>,
    pub status_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
    #[serde(default)]
    pub unassigned: bool,
    pub user_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    pub subject: Option<String>,
    #[serde(default)]
    pub not_closed: bool,
    pub order_by: Option<String>,
    pub order_dir: Option<OrderDir>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
