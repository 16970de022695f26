//! Compile [`ConversationPredicate`] lists into SQL.
//!
//! Every value is bound as a parameter; only whitelisted column names are
//! ever pushed as raw SQL.

use helpdesk_core::predicate::{escape_like, ConversationPredicate};
use helpdesk_core::status::CATEGORY_CLOSED;
use helpdesk_core::view::OrderDir;
use sqlx::{Postgres, QueryBuilder};

/// Append ` WHERE p1 AND p2 ...` for the given predicates. Pushes nothing
/// when the list is empty.
pub fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, predicates: &[ConversationPredicate]) {
    for (index, predicate) in predicates.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        push_predicate(builder, predicate);
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &ConversationPredicate) {
    match predicate {
        ConversationPredicate::NotClosed => {
            builder
                .push("conversations.status_category > ")
                .push_bind(CATEGORY_CLOSED);
        }
        ConversationPredicate::Closed => {
            builder
                .push("conversations.status_category <= ")
                .push_bind(CATEGORY_CLOSED);
        }
        ConversationPredicate::StatusCategory { category } => {
            builder
                .push("conversations.status_category = ")
                .push_bind(category.value());
        }
        ConversationPredicate::StatusIds { ids } => {
            builder
                .push("conversations.status_id = ANY(")
                .push_bind(ids.clone())
                .push(")");
        }
        ConversationPredicate::Group { group_id } => {
            builder
                .push("conversations.group_id = ")
                .push_bind(*group_id);
        }
        ConversationPredicate::Assignee {
            assignee_id: Some(assignee_id),
        } => {
            builder
                .push("conversations.assignee_id = ")
                .push_bind(*assignee_id);
        }
        ConversationPredicate::Assignee { assignee_id: None } => {
            builder.push("conversations.assignee_id IS NULL");
        }
        ConversationPredicate::Customer { user_id } => {
            builder
                .push("conversations.user_id = ")
                .push_bind(*user_id);
        }
        ConversationPredicate::Tag { tag_id } => {
            builder
                .push(
                    "EXISTS (SELECT 1 FROM conversation_tags ct \
                     WHERE ct.conversation_id = conversations.id AND ct.tag_id = ",
                )
                .push_bind(*tag_id)
                .push(")");
        }
        ConversationPredicate::SubjectContains { text } => {
            builder
                .push("conversations.subject ILIKE ")
                .push_bind(format!("%{}%", escape_like(text.trim())));
        }
    }
}

/// Map a whitelisted order column to its qualified SQL name.
pub fn order_column(name: &str) -> Option<&'static str> {
    match name {
        "id" => Some("conversations.id"),
        "created_at" => Some("conversations.created_at"),
        "updated_at" => Some("conversations.updated_at"),
        "status_category" => Some("conversations.status_category"),
        _ => None,
    }
}

/// Append ` ORDER BY <column> <dir>, conversations.id <dir>`. Unknown
/// columns fall back to `updated_at`.
pub fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order_by: &str, dir: OrderDir) {
    let column = order_column(order_by).unwrap_or("conversations.updated_at");
    builder.push(format!(" ORDER BY {column} {}", dir.as_sql()));
    if column != "conversations.id" {
        builder.push(format!(", conversations.id {}", dir.as_sql()));
    }
}
