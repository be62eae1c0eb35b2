use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;

use crate::http_server::{error::ApiError, state::AppState};
use crate::services::isrc_lookup::{IsrcLookup, IsrcLookupRequest};

#[axum::debug_handler]
pub async fn fetch_songs_by_isrc(
    State(app_state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<IsrcLookupRequest>, ApiError>,
) -> Result<Json<IsrcLookup>, ApiError> {
    let lookup = app_state.isrc_lookup.lookup(request).await?;
    Ok(Json(lookup))
}
