//! Repository for `conversation_items`.

use helpdesk_core::item::{ItemBody, ItemType, ITEM_MESSAGE};
use helpdesk_core::search::{clamp_limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT};
use helpdesk_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::conversation_item::{ConversationItem, ItemPage};

/// Column list for `conversation_items` queries.
const COLUMNS: &str = "\
    id, conversation_id, uuid, item_type, author_id, body_text, body_json, \
    created_at, updated_at";

pub struct ConversationItemRepo;

impl ConversationItemRepo {
    /// Append an item with a fresh UUID and bump the parent's `updated_at`.
    pub async fn create(
        pool: &PgPool,
        conversation_id: DbId,
        item_type: ItemType,
        author_id: Option<DbId>,
        body: &ItemBody,
    ) -> Result<ConversationItem, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO conversation_items \
                 (conversation_id, uuid, item_type, author_id, body_text, body_json) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ConversationItem>(&query)
            .bind(conversation_id)
            .bind(Uuid::new_v4())
            .bind(item_type.as_str())
            .bind(author_id)
            .bind(body.text())
            .bind(body.json())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ConversationItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversation_items WHERE id = $1");
        sqlx::query_as::<_, ConversationItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of the feed: the newest items older than `before`, returned
    /// oldest first so clients can prepend the page as-is.
    pub async fn list_page(
        pool: &PgPool,
        conversation_id: DbId,
        before: Option<DbId>,
        limit: Option<i64>,
    ) -> Result<ItemPage, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT);

        let query = format!(
            "SELECT {COLUMNS} FROM conversation_items \
             WHERE conversation_id = $1 AND ($2::BIGINT IS NULL OR id < $2) \
             ORDER BY id DESC \
             LIMIT $3"
        );
        let mut items = sqlx::query_as::<_, ConversationItem>(&query)
            .bind(conversation_id)
            .bind(before)
            .bind(limit + 1)
            .fetch_all(pool)
            .await?;

        let has_more = items.len() as i64 > limit;
        items.truncate(limit as usize);
        items.reverse();

        let next_before = if has_more {
            items.first().map(|item| item.id)
        } else {
            None
        };

        Ok(ItemPage {
            items,
            has_more,
            next_before,
        })
    }

    /// The first `per_conversation` message items of each conversation, in
    /// `created_at` order.
    pub async fn messages_for_conversations(
        pool: &PgPool,
        conversation_ids: &[DbId],
        per_conversation: i64,
    ) -> Result<Vec<ConversationItem>, sqlx::Error> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                 SELECT *, ROW_NUMBER() OVER ( \
                     PARTITION BY conversation_id ORDER BY created_at, id \
                 ) AS rn \
                 FROM conversation_items \
                 WHERE conversation_id = ANY($1) AND item_type = $2 \
             ) ranked \
             WHERE rn <= $3 \
             ORDER BY conversation_id, created_at, id"
        );
        sqlx::query_as::<_, ConversationItem>(&query)
            .bind(conversation_ids)
            .bind(ITEM_MESSAGE)
            .bind(per_conversation)
            .fetch_all(pool)
            .await
    }
}
