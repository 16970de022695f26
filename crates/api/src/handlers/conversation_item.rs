//! Handlers for conversation items (the message feed).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_core::error::CoreError;
use helpdesk_core::event_types::CONVERSATION_ITEM_CREATED;
use helpdesk_core::item::{validate_body, ItemType};
use helpdesk_core::types::{Actor, DbId};
use helpdesk_db::models::conversation_item::{CreateConversationItem, ItemFeedParams, ItemPage};
use helpdesk_db::repositories::ConversationItemRepo;
use helpdesk_events::bus::ITEM_TYPE_KEY;
use helpdesk_events::PlatformEvent;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::conversation::find_visible;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/conversations/{id}/items?before=&limit=
///
/// One page of the feed, oldest first. Follow `next_before` for older pages.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Query(params): Query<ItemFeedParams>,
) -> AppResult<Json<DataResponse<ItemPage>>> {
    find_visible(&state.pool, &auth, conversation_id).await?;
    let page =
        ConversationItemRepo::list_page(&state.pool, conversation_id, params.before, params.limit)
            .await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/conversations/{id}/items
///
/// Customers may only post messages.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<DbId>,
    Json(input): Json<CreateConversationItem>,
) -> AppResult<impl IntoResponse> {
    find_visible(&state.pool, &auth, conversation_id).await?;

    if matches!(auth.actor(), Actor::Customer(_)) && input.item_type != ItemType::Message {
        return Err(AppError::Core(CoreError::Forbidden(
            "Customers can only post messages".into(),
        )));
    }

    let body = validate_body(input.item_type, input.body).map_err(CoreError::from)?;
    let item = ConversationItemRepo::create(
        &state.pool,
        conversation_id,
        input.item_type,
        Some(auth.user_id),
        &body,
    )
    .await?;

    tracing::info!(
        conversation_id,
        item_id = item.id,
        item_type = %item.item_type,
        user_id = auth.user_id,
        "Conversation item created"
    );
    state.event_bus.publish(
        PlatformEvent::for_conversation(CONVERSATION_ITEM_CREATED, conversation_id)
            .with_actor(auth.user_id)
            .with_field("item_id", json!(item.id))
            .with_field(ITEM_TYPE_KEY, json!(item.item_type)),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}
