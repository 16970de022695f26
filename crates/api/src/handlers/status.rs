//! Handlers for the `/statuses` catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::conversation_status::{
    ConversationStatus, CreateConversationStatus, UpdateConversationStatus,
};
use helpdesk_db::repositories::{ConversationStatusRepo, RowLock};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum status label length in characters.
const MAX_LABEL_LEN: usize = 64;

/// GET /api/v1/statuses?include_inactive=
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<ConversationStatus>>>> {
    let statuses = ConversationStatusRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: statuses }))
}

/// GET /api/v1/statuses/defaults
///
/// The default status of each category, most open first.
pub async fn defaults(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ConversationStatus>>>> {
    let statuses = ConversationStatusRepo::list_defaults(&state.pool).await?;
    Ok(Json(DataResponse { data: statuses }))
}

/// GET /api/v1/statuses/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ConversationStatus>>> {
    let status = ConversationStatusRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ConversationStatus", id)))?;
    Ok(Json(DataResponse { data: status }))
}

/// POST /api/v1/statuses
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateConversationStatus>,
) -> AppResult<impl IntoResponse> {
    validate_label(&input.label)?;
    let status = ConversationStatusRepo::create(&state.pool, &input).await?;

    tracing::info!(
        status_id = status.id,
        category = status.category,
        user_id = admin.user_id,
        "Conversation status created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: status })))
}

/// PUT /api/v1/statuses/{id}
///
/// The category of a status cannot change while conversations use it:
/// their denormalized `status_category` would go stale.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateConversationStatus>,
) -> AppResult<Json<DataResponse<ConversationStatus>>> {
    if let Some(label) = &input.label {
        validate_label(label)?;
    }

    // The row lock serializes against transitions copying the category.
    let mut tx = state.pool.begin().await?;

    let existing = ConversationStatusRepo::find_locked(&mut *tx, id, RowLock::Update)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ConversationStatus", id)))?;

    let category_changes = input
        .category
        .is_some_and(|category| category.value() != existing.category);
    if category_changes && ConversationStatusRepo::is_in_use(&mut *tx, id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Status '{}' is in use; its category cannot change",
            existing.label
        ))));
    }

    let status = ConversationStatusRepo::update(&mut *tx, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ConversationStatus", id)))?;
    tx.commit().await?;

    tracing::info!(status_id = id, user_id = admin.user_id, "Conversation status updated");
    Ok(Json(DataResponse { data: status }))
}

fn validate_label(label: &str) -> AppResult<()> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Status label must not be empty".into()).into());
    }
    if trimmed.chars().count() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "Status label must be at most {MAX_LABEL_LEN} characters"
        ))
        .into());
    }
    Ok(())
}
