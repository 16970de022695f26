use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// ```text
/// GET /conversations?q=&limit=&offset=  -> search_conversations
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/conversations", get(search::search_conversations))
}
