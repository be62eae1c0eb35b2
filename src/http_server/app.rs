use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::http_server::{
    http_routes::{
        extract::extract_songs, isrc::fetch_songs_by_isrc, reco::recommended_tracks,
        videos::video_timeline, youtube_search::youtube_search,
    },
    state::AppState,
};

async fn health() -> &'static str {
    "ok"
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/videos", get(video_timeline))
        .route("/api/extract", post(extract_songs))
        .route("/api/fetch-songs-by-isrc", post(fetch_songs_by_isrc))
        .route("/api/youtube-search", get(youtube_search))
        .route("/api/reco", get(recommended_tracks))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(app_state)
}

pub async fn start(port: u16, app_state: AppState) -> color_eyre::Result<()> {
    let app = router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Listening on {}", port);
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
