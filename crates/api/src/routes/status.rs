//! Route definitions for the status catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// ```text
/// GET  /            -> list
/// POST /            -> create (admin)
/// GET  /defaults    -> defaults
/// GET  /{id}        -> get_by_id
/// PUT  /{id}        -> update (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status::list).post(status::create))
        .route("/defaults", get(status::defaults))
        .route("/{id}", get(status::get_by_id).put(status::update))
}
