//! Stored search documents and search hits.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `conversation_search_documents`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchDocumentRow {
    pub conversation_id: DbId,
    pub document: serde_json::Value,
    pub indexed_at: Timestamp,
}

/// A ranked full-text match.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchHit {
    pub conversation_id: DbId,
    pub document: serde_json::Value,
    pub rank: f32,
}

/// Query parameters for `GET /search/conversations`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
