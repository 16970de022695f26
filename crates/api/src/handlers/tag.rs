//! Handlers for conversation tags.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::event_types::CONVERSATION_TAGS_CHANGED;
use helpdesk_core::types::DbId;
use helpdesk_db::models::tag::{AttachTagsRequest, Tag};
use helpdesk_db::repositories::tag_repo::validate_tag_name;
use helpdesk_db::repositories::TagRepo;
use helpdesk_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::conversation::ensure_conversation_exists;
use crate::middleware::rbac::RequireAgent;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/conversations/{id}/tags
///
/// Attach tags by name, creating unknown ones. Returns the conversation's
/// full tag list.
pub async fn attach(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Json(input): Json<AttachTagsRequest>,
) -> AppResult<Json<DataResponse<Vec<Tag>>>> {
    ensure_conversation_exists(&state.pool, conversation_id).await?;

    if input.tag_names.is_empty() {
        return Err(AppError::BadRequest("tag_names must not be empty".into()));
    }
    for name in &input.tag_names {
        validate_tag_name(name).map_err(CoreError::Validation)?;
    }

    let mut attached = 0usize;
    for name in &input.tag_names {
        let tag = TagRepo::create_or_get(&state.pool, name).await?;
        if TagRepo::attach(&state.pool, conversation_id, tag.id).await? {
            attached += 1;
        }
    }

    if attached > 0 {
        tracing::info!(conversation_id, attached, user_id = agent.user_id, "Tags attached");
        state.event_bus.publish(
            PlatformEvent::for_conversation(CONVERSATION_TAGS_CHANGED, conversation_id)
                .with_actor(agent.user_id),
        );
    }

    let tags = TagRepo::list_for_conversation(&state.pool, conversation_id).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// DELETE /api/v1/conversations/{id}/tags/{tag_id}
pub async fn detach(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path((conversation_id, tag_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let removed = TagRepo::detach(&state.pool, conversation_id, tag_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::not_found("ConversationTag", tag_id)));
    }

    tracing::info!(conversation_id, tag_id, user_id = agent.user_id, "Tag detached");
    state.event_bus.publish(
        PlatformEvent::for_conversation(CONVERSATION_TAGS_CHANGED, conversation_id)
            .with_actor(agent.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
