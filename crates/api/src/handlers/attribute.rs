//! Handlers for custom conversation attributes.

use axum::extract::{Path, State};
use axum::Json;
use helpdesk_core::attribute::{validate_attributes, Attribute};
use helpdesk_core::error::CoreError;
use helpdesk_core::event_types::CONVERSATION_ATTRIBUTES_CHANGED;
use helpdesk_core::types::DbId;
use helpdesk_db::models::attribute::UpsertAttributesRequest;
use helpdesk_db::repositories::{AttributeRepo, ConversationRepo};
use helpdesk_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::conversation::ensure_conversation_exists;
use crate::middleware::rbac::RequireAgent;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/conversations/{id}/attributes
///
/// Insert or overwrite the given attributes; others are left alone.
/// Returns every attribute of the conversation.
pub async fn upsert(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Json(input): Json<UpsertAttributesRequest>,
) -> AppResult<Json<DataResponse<Vec<Attribute>>>> {
    ensure_conversation_exists(&state.pool, conversation_id).await?;
    validate_attributes(&input.attributes).map_err(CoreError::Validation)?;

    let mut tx = state.pool.begin().await?;
    AttributeRepo::upsert_many(&mut *tx, conversation_id, &input.attributes).await?;
    ConversationRepo::touch(&mut *tx, conversation_id).await?;
    tx.commit().await?;

    tracing::info!(
        conversation_id,
        count = input.attributes.len(),
        user_id = agent.user_id,
        "Custom attributes written"
    );
    state.event_bus.publish(
        PlatformEvent::for_conversation(CONVERSATION_ATTRIBUTES_CHANGED, conversation_id)
            .with_actor(agent.user_id),
    );

    let attributes = AttributeRepo::list_for_conversation(&state.pool, conversation_id).await?;
    Ok(Json(DataResponse { data: attributes }))
}
