use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::http_server::{error::ApiError, state::AppState};
use crate::timeline::timeline_text;

pub const NO_TIMELINE_MESSAGE: &str = "No timeline found in this video.";

#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoTimeline {
    description: String,
}

/// Plain-text timeline of a video's description.
#[axum::debug_handler]
pub async fn video_timeline(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<VideoQuery>,
) -> Result<Json<VideoTimeline>, ApiError> {
    let video_id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Video ID is required".to_string()))?;

    let description = app_state
        .youtube
        .video_description(&video_id)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch video data", e))?;

    let description = timeline_text(description.as_deref())
        .unwrap_or_else(|| NO_TIMELINE_MESSAGE.to_string());

    Ok(Json(VideoTimeline { description }))
}
