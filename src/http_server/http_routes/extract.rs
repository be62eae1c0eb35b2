use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::http_server::{error::ApiError, state::AppState};
use crate::timeline::SongEntry;

#[derive(Debug, Deserialize)]
pub struct ExtractInput {
    /// Anything but a string is treated as no description
    #[serde(default)]
    description: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ExtractOutput {
    songs: Vec<SongEntry>,
}

/// Run the extractor over a description supplied by the caller.
#[axum::debug_handler]
pub async fn extract_songs(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(input), _): WithRejection<Json<ExtractInput>, ApiError>,
) -> Json<ExtractOutput> {
    let description = input.description.as_ref().and_then(|value| value.as_str());
    let songs = app_state.extractor.extract(description);
    Json(ExtractOutput { songs })
}
