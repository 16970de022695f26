pub mod conversation;
pub mod health;
pub mod search;
pub mod status;
pub mod view;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                                          WebSocket push channel
///
/// /conversations                               list, create
/// /conversations/status                        bulk status change (agent)
/// /conversations/{id}                          get with relations
/// /conversations/{id}/items                    paged feed, append item
/// /conversations/{id}/tags                     attach tags (agent)
/// /conversations/{id}/tags/{tag_id}            detach tag (agent)
/// /conversations/{id}/attributes               upsert custom attributes (agent)
/// /conversations/{id}/search-document          search document preview (agent)
///
/// /search/conversations                        full-text search (agent)
///
/// /statuses                                    list, create (admin)
/// /statuses/defaults                           default status per category
/// /statuses/{id}                               get, update (admin)
///
/// /views                                       list accessible, create (agent)
/// /views/{id}                                  get, update, delete
/// /views/{id}/conversations                    conversations matching the view
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/conversations", conversation::router())
        .nest("/search", search::router())
        .nest("/statuses", status::router())
        .nest("/views", view::router())
}
