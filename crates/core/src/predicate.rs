//! Typed conversation filters.
//!
//! Callers compose a `Vec<ConversationPredicate>`; the repository layer
//! compiles it into a parameterized `WHERE` clause. Saved views store the
//! same list as JSON.

use serde::{Deserialize, Serialize};

use crate::status::StatusCategory;
use crate::types::DbId;

/// Maximum length of a subject substring filter.
pub const MAX_SUBJECT_FILTER_LEN: usize = 200;

/// One filter over the `conversations` table. All predicates in a list are
/// combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationPredicate {
    /// `status_category > CLOSED`.
    NotClosed,
    /// `status_category <= CLOSED`.
    Closed,
    StatusCategory { category: StatusCategory },
    StatusIds { ids: Vec<DbId> },
    Group { group_id: DbId },
    /// `None` matches unassigned conversations.
    Assignee { assignee_id: Option<DbId> },
    Customer { user_id: DbId },
    Tag { tag_id: DbId },
    /// Case-insensitive substring match on the subject.
    SubjectContains { text: String },
}

pub fn not_closed() -> ConversationPredicate {
    ConversationPredicate::NotClosed
}

pub fn closed() -> ConversationPredicate {
    ConversationPredicate::Closed
}

pub fn in_category(category: StatusCategory) -> ConversationPredicate {
    ConversationPredicate::StatusCategory { category }
}

pub fn with_statuses(ids: Vec<DbId>) -> ConversationPredicate {
    ConversationPredicate::StatusIds { ids }
}

pub fn in_group(group_id: DbId) -> ConversationPredicate {
    ConversationPredicate::Group { group_id }
}

pub fn assigned_to(assignee_id: DbId) -> ConversationPredicate {
    ConversationPredicate::Assignee {
        assignee_id: Some(assignee_id),
    }
}

pub fn unassigned() -> ConversationPredicate {
    ConversationPredicate::Assignee { assignee_id: None }
}

pub fn from_customer(user_id: DbId) -> ConversationPredicate {
    ConversationPredicate::Customer { user_id }
}

pub fn tagged(tag_id: DbId) -> ConversationPredicate {
    ConversationPredicate::Tag { tag_id }
}

pub fn subject_contains(text: impl Into<String>) -> ConversationPredicate {
    ConversationPredicate::SubjectContains { text: text.into() }
}

/// Reject predicate lists that would produce a meaningless query.
pub fn validate_predicates(predicates: &[ConversationPredicate]) -> Result<(), String> {
    for predicate in predicates {
        match predicate {
            ConversationPredicate::StatusIds { ids } if ids.is_empty() => {
                return Err("status_ids filter must list at least one status".into());
            }
            ConversationPredicate::SubjectContains { text } => {
                if text.trim().is_empty() {
                    return Err("subject filter must not be empty".into());
                }
                if text.chars().count() > MAX_SUBJECT_FILTER_LEN {
                    return Err(format!(
                        "subject filter must be at most {MAX_SUBJECT_FILTER_LEN} characters"
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Escape `%`, `_` and `\` for use inside an `ILIKE` pattern.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
