//! Handlers for saved conversation views.
//!
//! A view stores a predicate list, a sort and display columns. Owners and
//! admins may edit a view; visibility follows its access setting.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::predicate::{validate_predicates, ConversationPredicate};
use helpdesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helpdesk_core::types::DbId;
use helpdesk_core::view::{
    can_edit, can_view, validate_access, validate_columns, validate_name, validate_order_by,
    ViewAccess, Viewer, MAX_VIEW_FILTERS,
};
use helpdesk_db::models::conversation::Conversation;
use helpdesk_db::models::conversation_view::{
    ConversationView, CreateConversationView, UpdateConversationView,
};
use helpdesk_db::repositories::{ConversationRepo, ConversationViewRepo, UserRepo};
use helpdesk_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAgent;
use crate::query::PaginationParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// GET /api/v1/views
pub async fn list(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ConversationView>>>> {
    let viewer = agent.viewer(&state.pool).await?;
    let views = ConversationViewRepo::list_accessible(&state.pool, &viewer).await?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/views
pub async fn create(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Json(input): Json<CreateConversationView>,
) -> AppResult<impl IntoResponse> {
    let viewer = agent.viewer(&state.pool).await?;
    validate_name(&input.name).map_err(CoreError::Validation)?;
    validate_definition(&input.filters, input.order_by.as_deref(), &input.columns)?;
    validate_sharing(&state.pool, &viewer, input.access, input.group_id).await?;

    let view = ConversationViewRepo::create(&state.pool, agent.user_id, &input).await?;

    tracing::info!(
        view_id = view.id,
        user_id = agent.user_id,
        access = %view.access,
        "View created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/views/{id}
pub async fn get_by_id(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ConversationView>>> {
    let viewer = agent.viewer(&state.pool).await?;
    let view = find_viewable(&state.pool, &viewer, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/views/{id}
///
/// `group_id` can only change together with `access`.
pub async fn update(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateConversationView>,
) -> AppResult<Json<DataResponse<ConversationView>>> {
    let viewer = agent.viewer(&state.pool).await?;
    find_editable(&state.pool, &viewer, id).await?;

    if let Some(name) = &input.name {
        validate_name(name).map_err(CoreError::Validation)?;
    }
    validate_definition(
        input.filters.as_deref().unwrap_or_default(),
        input.order_by.as_deref(),
        input.columns.as_deref().unwrap_or_default(),
    )?;
    match input.access {
        Some(access) => validate_sharing(&state.pool, &viewer, access, input.group_id).await?,
        None if input.group_id.is_some() => {
            return Err(AppError::BadRequest(
                "group_id can only be changed together with access".into(),
            ))
        }
        None => {}
    }

    let view = ConversationViewRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ConversationView", id)))?;

    tracing::info!(view_id = id, user_id = agent.user_id, "View updated");
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/views/{id}
pub async fn delete(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let viewer = agent.viewer(&state.pool).await?;
    find_editable(&state.pool, &viewer, id).await?;

    ConversationViewRepo::delete(&state.pool, id).await?;
    tracing::info!(view_id = id, user_id = agent.user_id, "View deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/views/{id}/conversations?limit=&offset=
///
/// Run the view's predicates with its sort order.
pub async fn conversations(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ListResponse<Conversation>>> {
    let viewer = agent.viewer(&state.pool).await?;
    let view = find_viewable(&state.pool, &viewer, id).await?;

    let predicates = view.predicates().map_err(|e| {
        AppError::InternalError(format!("View {id} has unreadable filters: {e}"))
    })?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let data = ConversationRepo::list(
        &state.pool,
        &predicates,
        &view.order_by,
        view.direction(),
        limit,
        offset,
    )
    .await?;
    let total = ConversationRepo::count(&state.pool, &predicates).await?;

    Ok(Json(ListResponse { data, total }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_view(pool: &DbPool, id: DbId) -> AppResult<ConversationView> {
    ConversationViewRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ConversationView", id)))
}

async fn find_viewable(pool: &DbPool, viewer: &Viewer, id: DbId) -> AppResult<ConversationView> {
    let view = find_view(pool, id).await?;
    let scope = view
        .scope()
        .ok_or_else(|| AppError::InternalError(format!("View {id} has unknown access")))?;
    if !can_view(scope, viewer) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this view".into(),
        )));
    }
    Ok(view)
}

async fn find_editable(pool: &DbPool, viewer: &Viewer, id: DbId) -> AppResult<ConversationView> {
    let view = find_viewable(pool, viewer, id).await?;
    let scope = view
        .scope()
        .ok_or_else(|| AppError::InternalError(format!("View {id} has unknown access")))?;
    if !can_edit(scope, viewer) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an admin can change this view".into(),
        )));
    }
    Ok(view)
}

fn validate_definition(
    filters: &[ConversationPredicate],
    order_by: Option<&str>,
    columns: &[String],
) -> AppResult<()> {
    if filters.len() > MAX_VIEW_FILTERS {
        return Err(CoreError::Validation(format!(
            "A view can have at most {MAX_VIEW_FILTERS} filters"
        ))
        .into());
    }
    validate_predicates(filters).map_err(CoreError::Validation)?;
    if let Some(order_by) = order_by {
        validate_order_by(order_by).map_err(CoreError::Validation)?;
    }
    validate_columns(columns).map_err(CoreError::Validation)?;
    Ok(())
}

/// Group-shared views need an existing group the author belongs to
/// (admins may share with any group).
async fn validate_sharing(
    pool: &DbPool,
    viewer: &Viewer,
    access: ViewAccess,
    group_id: Option<DbId>,
) -> AppResult<()> {
    validate_access(access, group_id).map_err(CoreError::Validation)?;
    if let Some(group_id) = group_id {
        if !UserRepo::group_exists(pool, group_id).await? {
            return Err(AppError::Core(CoreError::not_found("Group", group_id)));
        }
        if !viewer.is_admin && !viewer.group_ids.contains(&group_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "You can only share views with your own groups".into(),
            )));
        }
    }
    Ok(())
}
