//! Repository for saved `conversation_views`.

use helpdesk_core::types::DbId;
use helpdesk_core::view::{OrderDir, ViewAccess, Viewer};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::conversation_view::{
    ConversationView, CreateConversationView, UpdateConversationView,
};

/// Column list for `conversation_views` queries.
const COLUMNS: &str = "\
    id, name, description, owner_id, access, group_id, filters, order_by, \
    order_dir, columns, pinned, created_at, updated_at";

/// Sort column used when a view does not name one.
const DEFAULT_ORDER_BY: &str = "updated_at";

pub struct ConversationViewRepo;

impl ConversationViewRepo {
    /// Views the viewer may open: everything for admins, otherwise their
    /// own, shared ones, and those of groups they belong to.
    pub async fn list_accessible(
        pool: &PgPool,
        viewer: &Viewer,
    ) -> Result<Vec<ConversationView>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_views \
             WHERE $1 \
                OR owner_id = $2 \
                OR access = 'anyone' \
                OR (access = 'group' AND group_id = ANY($3)) \
             ORDER BY pinned DESC, name, id"
        );
        sqlx::query_as::<_, ConversationView>(&query)
            .bind(viewer.is_admin)
            .bind(viewer.user_id)
            .bind(&viewer.group_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConversationView>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversation_views WHERE id = $1");
        sqlx::query_as::<_, ConversationView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateConversationView,
    ) -> Result<ConversationView, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversation_views \
                 (name, description, owner_id, access, group_id, filters, order_by, \
                  order_dir, columns, pinned) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConversationView>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(owner_id)
            .bind(input.access.as_str())
            .bind(input.group_id)
            .bind(Json(&input.filters))
            .bind(input.order_by.as_deref().unwrap_or(DEFAULT_ORDER_BY))
            .bind(input.order_dir.unwrap_or_default().as_str())
            .bind(Json(&input.columns))
            .bind(input.pinned)
            .fetch_one(pool)
            .await
    }

    /// Patch a view. When `access` is given, `group_id` is written along
    /// with it (clearing it for non-group access).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateConversationView,
    ) -> Result<Option<ConversationView>, sqlx::Error> {
        let query = format!(
            "UPDATE conversation_views SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 access = COALESCE($4, access), \
                 group_id = CASE WHEN $4::TEXT IS NULL THEN group_id ELSE $5 END, \
                 filters = COALESCE($6, filters), \
                 order_by = COALESCE($7, order_by), \
                 order_dir = COALESCE($8, order_dir), \
                 columns = COALESCE($9, columns), \
                 pinned = COALESCE($10, pinned), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConversationView>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.access.map(ViewAccess::as_str))
            .bind(input.group_id)
            .bind(input.filters.as_ref().map(Json))
            .bind(&input.order_by)
            .bind(input.order_dir.map(OrderDir::as_str))
            .bind(input.columns.as_ref().map(Json))
            .bind(input.pinned)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM conversation_views WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
