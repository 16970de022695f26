//! Saved conversation view models and DTOs.

use helpdesk_core::predicate::ConversationPredicate;
use helpdesk_core::types::{DbId, Timestamp};
use helpdesk_core::view::{OrderDir, ViewAccess, ViewScope};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `conversation_views` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationView {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub access: String,
    pub group_id: Option<DbId>,
    /// JSON array of [`ConversationPredicate`].
    pub filters: serde_json::Value,
    pub order_by: String,
    pub order_dir: String,
    /// JSON array of column keys.
    pub columns: serde_json::Value,
    pub pinned: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationView {
    /// Access fields as domain types. `None` only if the stored access
    /// string is unknown, which the table check constraint rules out.
    pub fn scope(&self) -> Option<ViewScope> {
        Some(ViewScope {
            owner_id: self.owner_id,
            access: ViewAccess::parse(&self.access)?,
            group_id: self.group_id,
        })
    }

    pub fn predicates(&self) -> Result<Vec<ConversationPredicate>, serde_json::Error> {
        serde_json::from_value(self.filters.clone())
    }

    pub fn direction(&self) -> OrderDir {
        OrderDir::parse(&self.order_dir).unwrap_or_default()
    }
}

/// DTO for creating a view.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationView {
    pub name: String,
    pub description: Option<String>,
    pub access: ViewAccess,
    pub group_id: Option<DbId>,
    #[serde(default)]
    pub filters: Vec<ConversationPredicate>,
    pub order_by: Option<String>,
    pub order_dir: Option<OrderDir>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
}

/// DTO for updating a view. Access and group are updated together.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConversationView {
    pub name: Option<String>,
    pub description: Option<String>,
    pub access: Option<ViewAccess>,
    pub group_id: Option<DbId>,
    pub filters: Option<Vec<ConversationPredicate>>,
    pub order_by: Option<String>,
    pub order_dir: Option<OrderDir>,
    pub columns: Option<Vec<String>>,
    pub pinned: Option<bool>,
}
