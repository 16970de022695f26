//! Repository for `conversation_search_documents`.
//!
//! Text is indexed with the `simple` configuration so prefix queries built
//! by [`helpdesk_core::search::build_prefix_tsquery`] match raw tokens.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::search_document::{SearchDocumentRow, SearchHit};

pub struct SearchDocumentRepo;

impl SearchDocumentRepo {
    /// Replace the stored document for a conversation.
    pub async fn upsert(
        pool: &PgPool,
        conversation_id: DbId,
        document: &serde_json::Value,
        text: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO conversation_search_documents \
                 (conversation_id, document, search_vector, indexed_at) \
             VALUES ($1, $2, to_tsvector('simple', $3), NOW()) \
             ON CONFLICT (conversation_id) DO UPDATE SET \
                 document = EXCLUDED.document, \
                 search_vector = EXCLUDED.search_vector, \
                 indexed_at = EXCLUDED.indexed_at",
        )
        .bind(conversation_id)
        .bind(document)
        .bind(text)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find(
        pool: &PgPool,
        conversation_id: DbId,
    ) -> Result<Option<SearchDocumentRow>, sqlx::Error> {
        sqlx::query_as::<_, SearchDocumentRow>(
            "SELECT conversation_id, document, indexed_at \
             FROM conversation_search_documents WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .fetch_optional(pool)
        .await
    }

    /// Ranked matches for a `to_tsquery` expression, best first.
    pub async fn search(
        pool: &PgPool,
        tsquery: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(
            "SELECT conversation_id, document, \
                    ts_rank(search_vector, to_tsquery('simple', $1)) AS rank \
             FROM conversation_search_documents \
             WHERE search_vector @@ to_tsquery('simple', $1) \
             ORDER BY rank DESC, conversation_id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(tsquery)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, conversation_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM conversation_search_documents WHERE conversation_id = $1")
                .bind(conversation_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
