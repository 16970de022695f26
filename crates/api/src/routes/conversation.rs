//! Route definitions for `/conversations`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{attribute, conversation, conversation_item, tag};
use crate::state::AppState;

/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// POST   /status                    -> change_conversation_status
/// GET    /{id}                      -> get_by_id
/// GET    /{id}/items                -> conversation_item::list
/// POST   /{id}/items                -> conversation_item::create
/// POST   /{id}/tags                 -> tag::attach
/// DELETE /{id}/tags/{tag_id}        -> tag::detach
/// PUT    /{id}/attributes           -> attribute::upsert
/// GET    /{id}/search-document      -> search_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(conversation::list).post(conversation::create))
        .route("/status", post(conversation::change_conversation_status))
        .route("/{id}", get(conversation::get_by_id))
        .route(
            "/{id}/items",
            get(conversation_item::list).post(conversation_item::create),
        )
        .route("/{id}/tags", post(tag::attach))
        .route("/{id}/tags/{tag_id}", delete(tag::detach))
        .route("/{id}/attributes", put(attribute::upsert))
        .route("/{id}/search-document", get(conversation::search_document))
}
