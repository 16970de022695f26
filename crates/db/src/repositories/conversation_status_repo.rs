//! Repository for the `conversation_statuses` catalog.

use helpdesk_core::status::StatusCategory;
use helpdesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::conversation_status::{
    ConversationStatus, CreateConversationStatus, UpdateConversationStatus,
};

/// Column list for `conversation_statuses` queries.
const COLUMNS: &str = "\
    id, label, category, active, is_default, sort_order, created_at, updated_at";

/// Row lock strength for [`ConversationStatusRepo::find_locked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    Share,
    Update,
}

impl RowLock {
    fn clause(self) -> &'static str {
        match self {
            RowLock::Share => "FOR SHARE",
            RowLock::Update => "FOR UPDATE",
        }
    }
}

/// Provides CRUD operations for conversation statuses.
pub struct ConversationStatusRepo;

impl ConversationStatusRepo {
    /// List statuses in catalog order. Inactive ones are included on request.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<ConversationStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_statuses \
             WHERE active OR $1 \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ConversationStatus>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConversationStatus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversation_statuses WHERE id = $1");
        sqlx::query_as::<_, ConversationStatus>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Read a status and hold a row lock until the transaction ends.
    /// Writers to the catalog take `FOR UPDATE`; conversation writes that
    /// copy the category take `FOR SHARE`.
    pub async fn find_locked(
        conn: &mut PgConnection,
        id: DbId,
        mode: RowLock,
    ) -> Result<Option<ConversationStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_statuses WHERE id = $1 {}",
            mode.clause()
        );
        sqlx::query_as::<_, ConversationStatus>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Active default statuses, at most one per category (lowest
    /// `sort_order` wins), most open category first.
    pub async fn list_defaults(pool: &PgPool) -> Result<Vec<ConversationStatus>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (category) {COLUMNS} FROM conversation_statuses \
             WHERE is_default AND active \
             ORDER BY category DESC, sort_order, id"
        );
        sqlx::query_as::<_, ConversationStatus>(&query)
            .fetch_all(pool)
            .await
    }

    /// The default status for one category.
    pub async fn default_for_category(
        pool: &PgPool,
        category: StatusCategory,
    ) -> Result<Option<ConversationStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_statuses \
             WHERE category = $1 AND is_default AND active \
             ORDER BY sort_order, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, ConversationStatus>(&query)
            .bind(category.value())
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateConversationStatus,
    ) -> Result<ConversationStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversation_statuses (label, category, active, is_default, sort_order) \
             VALUES ($1, $2, COALESCE($3, TRUE), COALESCE($4, FALSE), \
                     COALESCE($5, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM conversation_statuses))) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConversationStatus>(&query)
            .bind(input.label.trim())
            .bind(input.category.value())
            .bind(input.active)
            .bind(input.is_default)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Update a status. Returns `None` if it does not exist.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateConversationStatus,
    ) -> Result<Option<ConversationStatus>, sqlx::Error> {
        let query = format!(
            "UPDATE conversation_statuses SET \
                 label = COALESCE($2, label), \
                 category = COALESCE($3, category), \
                 active = COALESCE($4, active), \
                 is_default = COALESCE($5, is_default), \
                 sort_order = COALESCE($6, sort_order), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConversationStatus>(&query)
            .bind(id)
            .bind(input.label.as_deref().map(str::trim))
            .bind(input.category.map(StatusCategory::value))
            .bind(input.active)
            .bind(input.is_default)
            .bind(input.sort_order)
            .fetch_optional(conn)
            .await
    }

    /// Whether any conversation currently uses the status.
    pub async fn is_in_use(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM conversations WHERE status_id = $1)")
                .bind(id)
                .fetch_one(conn)
                .await?;
        Ok(row.0)
    }
}
