//! Full-text conversation search.

use axum::extract::{Query, State};
use axum::Json;
use helpdesk_core::search::{
    build_prefix_tsquery, clamp_limit, clamp_offset, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
};
use helpdesk_db::models::search_document::{SearchHit, SearchParams};
use helpdesk_db::repositories::SearchDocumentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAgent;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/search/conversations?q=
///
/// Matches every term; the last term also matches as a prefix.
pub async fn search_conversations(
    RequireAgent(_agent): RequireAgent,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<SearchHit>>>> {
    let tsquery = build_prefix_tsquery(&params.q).ok_or_else(|| {
        AppError::BadRequest("Search query must contain at least one word".into())
    })?;
    let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
    let offset = clamp_offset(params.offset);

    let hits = SearchDocumentRepo::search(&state.pool, &tsquery, limit, offset).await?;
    tracing::debug!(query = %params.q, hits = hits.len(), "Conversation search");
    Ok(Json(DataResponse { data: hits }))
}
