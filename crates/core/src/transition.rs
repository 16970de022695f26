//! Field delta for a conversation status change.
//!
//! [`plan_status_change`] decides which columns a transition writes. The same
//! [`StatusDelta`] is used for the bulk SQL update and for patching records
//! already held in memory, so both always agree.

use serde::Serialize;

use crate::status::{StatusCategory, CATEGORY_CLOSED};
use crate::types::{Actor, DbId, Timestamp};

/// What happens to `closed_at` / `closed_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClosureChange {
    /// Target category is `<= CLOSED`. `closed_by` is only written when the
    /// actor is an agent; otherwise the previous value is kept.
    Close {
        closed_at: Timestamp,
        closed_by: Option<DbId>,
    },
    /// Target category is `> CLOSED`: both fields are cleared.
    Reopen,
}

/// Columns written by a status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDelta {
    pub status_id: DbId,
    pub status_category: StatusCategory,
    pub closure: ClosureChange,
}

/// Mutable view over the status columns of an in-memory conversation.
pub struct StatusFieldsMut<'a> {
    pub status_id: &'a mut DbId,
    pub status_category: &'a mut i16,
    pub closed_at: &'a mut Option<Timestamp>,
    pub closed_by: &'a mut Option<DbId>,
}

/// Compute the delta for moving conversations into `status_id`.
pub fn plan_status_change(
    status_id: DbId,
    category: StatusCategory,
    actor: Actor,
    now: Timestamp,
) -> StatusDelta {
    let closure = if category.value() <= CATEGORY_CLOSED {
        ClosureChange::Close {
            closed_at: now,
            closed_by: actor.agent_id(),
        }
    } else {
        ClosureChange::Reopen
    };

    StatusDelta {
        status_id,
        status_category: category,
        closure,
    }
}

impl StatusDelta {
    /// Value written to `closed_at`.
    pub fn closed_at(&self) -> Option<Timestamp> {
        match self.closure {
            ClosureChange::Close { closed_at, .. } => Some(closed_at),
            ClosureChange::Reopen => None,
        }
    }

    /// `Some(value)` when `closed_by` must be overwritten with `value`,
    /// `None` when the column is left untouched.
    pub fn closed_by_update(&self) -> Option<Option<DbId>> {
        match self.closure {
            ClosureChange::Close {
                closed_by: Some(agent),
                ..
            } => Some(Some(agent)),
            ClosureChange::Close { closed_by: None, .. } => None,
            ClosureChange::Reopen => Some(None),
        }
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.closure, ClosureChange::Close { .. })
    }

    /// Apply the delta to an in-memory record.
    pub fn apply(&self, fields: StatusFieldsMut<'_>) {
        *fields.status_id = self.status_id;
        *fields.status_category = self.status_category.value();
        *fields.closed_at = self.closed_at();
        if let Some(closed_by) = self.closed_by_update() {
            *fields.closed_by = closed_by;
        }
    }
}
