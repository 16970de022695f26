//! Handlers for the `/conversations` resource.
//!
//! Agents see every conversation; customers only their own.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::event_types::CONVERSATION_CREATED;
use helpdesk_core::predicate::{self, ConversationPredicate};
use helpdesk_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use helpdesk_core::status::{validate_category, StatusCategory};
use helpdesk_core::types::{Actor, DbId};
use helpdesk_core::view::validate_order_by;
use helpdesk_db::models::conversation::{
    ChangeStatusRequest, Conversation, ConversationListParams, ConversationWithRelations,
    CreateConversation,
};
use helpdesk_db::models::conversation_status::ConversationStatus;
use helpdesk_db::repositories::{ConversationRepo, ConversationStatusRepo};
use helpdesk_db::search_document::build_search_document;
use helpdesk_db::DbPool;
use helpdesk_events::PlatformEvent;

use crate::engine::{change_status, TransitionOptions, TransitionTarget};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAgent;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// Maximum subject length in characters.
const MAX_SUBJECT_LEN: usize = 500;

/// Maximum number of conversations in one status change request.
const MAX_BULK_STATUS_IDS: usize = 500;

/// GET /api/v1/conversations
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ConversationListParams>,
) -> AppResult<impl IntoResponse> {
    let predicates = predicates_from_params(&params, &auth)?;
    let order_by = params.order_by.as_deref().unwrap_or("updated_at");
    validate_order_by(order_by).map_err(CoreError::Validation)?;

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let data = ConversationRepo::list(
        &state.pool,
        &predicates,
        order_by,
        params.order_dir.unwrap_or_default(),
        limit,
        offset,
    )
    .await?;
    let total = ConversationRepo::count(&state.pool, &predicates).await?;

    Ok(Json(ListResponse { data, total }))
}

/// POST /api/v1/conversations
///
/// Customers always open conversations for themselves. Without a
/// `status_id` the default open status is used.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateConversation>,
) -> AppResult<impl IntoResponse> {
    validate_subject(&input.subject)?;

    let actor = auth.actor();
    if let Actor::Customer(user_id) = actor {
        input.user_id = Some(user_id);
        input.assignee_id = None;
        input.status_id = None;
    }

    let status = match input.status_id {
        Some(status_id) => active_status(&state.pool, status_id).await?,
        None => ConversationStatusRepo::default_for_category(&state.pool, StatusCategory::Open)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "No active default status configured for the open category".into(),
                ))
            })?,
    };

    let conversation = ConversationRepo::create(&state.pool, &input, &status, actor).await?;

    tracing::info!(
        conversation_id = conversation.id,
        user_id = auth.user_id,
        status_id = status.id,
        "Conversation created"
    );
    state.event_bus.publish(
        PlatformEvent::for_conversation(CONVERSATION_CREATED, conversation.id)
            .with_actor(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: conversation })))
}

/// GET /api/v1/conversations/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ConversationWithRelations>>> {
    let conversation = load_with_relations(&state.pool, &auth, id).await?;
    Ok(Json(DataResponse { data: conversation }))
}

/// POST /api/v1/conversations/status
///
/// Move a batch of conversations to one status. Unknown conversation ids
/// are skipped; the response lists the records that were updated.
pub async fn change_conversation_status(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<Vec<Conversation>>>> {
    if input.conversation_ids.len() > MAX_BULK_STATUS_IDS {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_BULK_STATUS_IDS} conversations can change status at once"
        )));
    }

    let status = active_status(&state.pool, input.status_id).await?;

    let updated = change_status(
        &state.pool,
        &state.event_bus,
        &status,
        TransitionTarget::Ids(input.conversation_ids),
        agent.actor(),
        TransitionOptions {
            notify_on_empty: state.config.notify_on_empty_transition,
        },
    )
    .await?;

    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/conversations/{id}/search-document
///
/// The search document as the indexer would build it right now.
pub async fn search_document(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let conversation = load_with_relations(&state.pool, &agent, id).await?;
    Ok(Json(DataResponse {
        data: build_search_document(&conversation),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a conversation the caller may see. Customers get 404 for other
/// customers' conversations.
pub async fn find_visible(pool: &DbPool, auth: &AuthUser, id: DbId) -> AppResult<Conversation> {
    let conversation = ConversationRepo::find_by_id(pool, id)
        .await?
        .filter(|c| is_visible(c, auth))
        .ok_or(AppError::Core(CoreError::not_found("Conversation", id)))?;
    Ok(conversation)
}

/// Ensure the conversation exists (no visibility check; agent routes).
pub async fn ensure_conversation_exists(pool: &DbPool, id: DbId) -> AppResult<Conversation> {
    ConversationRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Conversation", id)))
}

async fn load_with_relations(
    pool: &DbPool,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<ConversationWithRelations> {
    ConversationRepo::load_with_relations(pool, &[id])
        .await?
        .into_iter()
        .find(|c| is_visible(&c.conversation, auth))
        .ok_or(AppError::Core(CoreError::not_found("Conversation", id)))
}

fn is_visible(conversation: &Conversation, auth: &AuthUser) -> bool {
    match auth.actor() {
        Actor::Customer(user_id) => conversation.user_id == Some(user_id),
        Actor::Agent(_) | Actor::System => true,
    }
}

/// Find a status usable as a transition or creation target.
async fn active_status(pool: &DbPool, id: DbId) -> AppResult<ConversationStatus> {
    let status = ConversationStatusRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ConversationStatus", id)))?;
    if !status.active {
        return Err(AppError::BadRequest(format!(
            "Status '{}' is inactive",
            status.label
        )));
    }
    Ok(status)
}

fn validate_subject(subject: &str) -> AppResult<()> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Subject must not be empty".into()).into());
    }
    if trimmed.chars().count() > MAX_SUBJECT_LEN {
        return Err(CoreError::Validation(format!(
            "Subject must be at most {MAX_SUBJECT_LEN} characters"
        ))
        .into());
    }
    Ok(())
}

/// Translate list query parameters into predicates. Customers are always
/// restricted to their own conversations.
pub fn predicates_from_params(
    params: &ConversationListParams,
    auth: &AuthUser,
) -> AppResult<Vec<ConversationPredicate>> {
    let mut predicates = Vec::new();

    if params.not_closed {
        predicates.push(predicate::not_closed());
    }
    if let Some(value) = params.status_category {
        let category = validate_category(value).map_err(CoreError::Validation)?;
        predicates.push(predicate::in_category(category));
    }
    if let Some(status_id) = params.status_id {
        predicates.push(predicate::with_statuses(vec![status_id]));
    }
    if let Some(group_id) = params.group_id {
        predicates.push(predicate::in_group(group_id));
    }
    match (params.assignee_id, params.unassigned) {
        (Some(_), true) => {
            return Err(AppError::BadRequest(
                "assignee_id and unassigned cannot be combined".into(),
            ))
        }
        (Some(assignee_id), false) => predicates.push(predicate::assigned_to(assignee_id)),
        (None, true) => predicates.push(predicate::unassigned()),
        (None, false) => {}
    }
    if let Some(tag_id) = params.tag_id {
        predicates.push(predicate::tagged(tag_id));
    }
    if let Some(subject) = params.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        predicates.push(predicate::subject_contains(subject));
    }

    match auth.actor() {
        Actor::Customer(user_id) => predicates.push(predicate::from_customer(user_id)),
        _ => {
            if let Some(user_id) = params.user_id {
                predicates.push(predicate::from_customer(user_id));
            }
        }
    }

    predicate::validate_predicates(&predicates).map_err(CoreError::Validation)?;
    Ok(predicates)
}
