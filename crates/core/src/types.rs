use serde::{Deserialize, Serialize};

use crate::roles::{ROLE_ADMIN, ROLE_AGENT};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The user on whose behalf an operation runs.
///
/// Passed explicitly into services instead of being read from request-global
/// state. Only agents are recorded as the closer of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum Actor {
    /// Internal support user (`agent` or `admin` role).
    Agent(DbId),
    /// End user writing in to the help desk.
    Customer(DbId),
    /// Background jobs and automations.
    System,
}

impl Actor {
    /// Classify an authenticated user by role name.
    pub fn from_role(user_id: DbId, role: &str) -> Self {
        if role == ROLE_AGENT || role == ROLE_ADMIN {
            Actor::Agent(user_id)
        } else {
            Actor::Customer(user_id)
        }
    }

    /// The acting user's id, if there is a user behind the action.
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Actor::Agent(id) | Actor::Customer(id) => Some(*id),
            Actor::System => None,
        }
    }

    /// The agent's id, or `None` for customers and the system.
    pub fn agent_id(&self) -> Option<DbId> {
        match self {
            Actor::Agent(id) => Some(*id),
            _ => None,
        }
    }
}
