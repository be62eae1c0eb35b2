use std::sync::Arc;

use axum::{Json, extract::State};

use crate::http_server::{error::ApiError, state::AppState};
use crate::services::recommendation::Recommendation;

/// Tracks from the top playlist of the configured Spotify search.
#[axum::debug_handler]
pub async fn recommended_tracks(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let tracks = app_state
        .recommendations
        .recommend()
        .await
        .map_err(|e| ApiError::upstream("Cannot get recommended tracks", e))?;
    Ok(Json(tracks))
}
