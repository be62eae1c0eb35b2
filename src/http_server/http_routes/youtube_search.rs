use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::http_server::{error::ApiError, state::AppState};
use crate::ports::youtube::VideoSearchPage;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[axum::debug_handler]
pub async fn youtube_search(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<VideoSearchPage>, ApiError> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Search query is required".to_string()))?;

    let page = app_state
        .youtube
        .search_videos(&q)
        .await
        .map_err(|e| ApiError::upstream("Failed to search YouTube videos", e))?;

    Ok(Json(page))
}
