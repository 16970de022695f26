//! Route definitions for saved views.

use axum::routing::get;
use axum::Router;

use crate::handlers::view;
use crate::state::AppState;

/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /{id}/conversations     -> conversations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view::list).post(view::create))
        .route(
            "/{id}",
            get(view::get_by_id).put(view::update).delete(view::delete),
        )
        .route("/{id}/conversations", get(view::conversations))
}
