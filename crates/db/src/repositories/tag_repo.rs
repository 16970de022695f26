//! Repository for `tags` and the `conversation_tags` junction table.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{ConversationTagLink, Tag};

/// Maximum tag name length after normalization.
pub const MAX_TAG_NAME_LEN: usize = 64;

pub struct TagRepo;

impl TagRepo {
    /// Create a tag or return the existing one with the same normalized name.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let normalized = normalize_tag_name(name);
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING id, name, created_at",
        )
        .bind(&normalized)
        .fetch_one(pool)
        .await
    }

    /// Attach a tag. Returns `false` if it was already attached.
    pub async fn attach(
        pool: &PgPool,
        conversation_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO conversation_tags (conversation_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT (conversation_id, tag_id) DO NOTHING",
        )
        .bind(conversation_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Detach a tag. Returns `false` if it was not attached.
    pub async fn detach(
        pool: &PgPool,
        conversation_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM conversation_tags WHERE conversation_id = $1 AND tag_id = $2",
        )
        .bind(conversation_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tags of one conversation, by name.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.created_at \
             FROM conversation_tags ct \
             JOIN tags t ON t.id = ct.tag_id \
             WHERE ct.conversation_id = $1 \
             ORDER BY t.name",
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await
    }

    /// Tag links for many conversations at once.
    pub async fn links_for_conversations(
        pool: &PgPool,
        conversation_ids: &[DbId],
    ) -> Result<Vec<ConversationTagLink>, sqlx::Error> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ConversationTagLink>(
            "SELECT conversation_id, tag_id FROM conversation_tags \
             WHERE conversation_id = ANY($1) \
             ORDER BY conversation_id, tag_id",
        )
        .bind(conversation_ids)
        .fetch_all(pool)
        .await
    }
}

/// Lowercase, trim and collapse inner whitespace.
pub fn normalize_tag_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Validate a tag name before it reaches the database.
pub fn validate_tag_name(name: &str) -> Result<(), String> {
    let normalized = normalize_tag_name(name);
    if normalized.is_empty() {
        return Err("Tag name must not be empty".into());
    }
    if normalized.chars().count() > MAX_TAG_NAME_LEN {
        return Err(format!("Tag name must be at most {MAX_TAG_NAME_LEN} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        assert_eq!(normalize_tag_name("  Billing   Issue "), "billing issue");
        assert_eq!(normalize_tag_name("VIP"), "vip");
    }

    #[test]
    fn blank_and_long_names_are_rejected() {
        assert!(validate_tag_name("   ").is_err());
        assert!(validate_tag_name(&"x".repeat(MAX_TAG_NAME_LEN + 1)).is_err());
        assert!(validate_tag_name("refund").is_ok());
    }
}
