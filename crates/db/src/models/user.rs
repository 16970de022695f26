//! Read-only user and group projections.

use helpdesk_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from `users`, reduced to what conversations display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A row from `groups`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupSummary {
    pub id: DbId,
    pub name: String,
}
