//! Repository for `conversation_attributes`.

use helpdesk_core::attribute::Attribute;
use helpdesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::attribute::ConversationAttributeRow;

pub struct AttributeRepo;

impl AttributeRepo {
    /// Insert or overwrite every attribute. Run it inside the caller's
    /// transaction together with [`ConversationRepo::touch`].
    ///
    /// [`ConversationRepo::touch`]: crate::repositories::ConversationRepo::touch
    pub async fn upsert_many(
        conn: &mut PgConnection,
        conversation_id: DbId,
        attributes: &[Attribute],
    ) -> Result<(), sqlx::Error> {
        for attribute in attributes {
            sqlx::query(
                "INSERT INTO conversation_attributes (conversation_id, key, value) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (conversation_id, key) \
                 DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
            )
            .bind(conversation_id)
            .bind(&attribute.key)
            .bind(attribute.value.to_json())
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Attributes of one conversation, ordered by key.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: DbId,
    ) -> Result<Vec<Attribute>, sqlx::Error> {
        let rows = Self::rows_for_conversations(pool, &[conversation_id]).await?;
        Ok(rows
            .into_iter()
            .filter_map(ConversationAttributeRow::into_attribute)
            .collect())
    }

    /// Raw attribute rows for many conversations.
    pub async fn rows_for_conversations(
        pool: &PgPool,
        conversation_ids: &[DbId],
    ) -> Result<Vec<ConversationAttributeRow>, sqlx::Error> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ConversationAttributeRow>(
            "SELECT conversation_id, key, value FROM conversation_attributes \
             WHERE conversation_id = ANY($1) \
             ORDER BY conversation_id, key",
        )
        .bind(conversation_ids)
        .fetch_all(pool)
        .await
    }
}
