use std::num::NonZeroU32;
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::Context;
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::{Config, SpotifyCredentials};
use crate::ports::spotify::{PlaylistRecommendations, RecommendedTrack, TrackMatch, TrackSearch};
use crate::services::spotify::auth::TokenCache;
use crate::services::spotify::types::{
    SpotifyPlaylistSearchResponse, SpotifyPlaylistTracksResponse, SpotifySearchResponse,
};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spotify Web API client for catalog search, using an app token.
pub struct SpotifyCatalogClient {
    client: Client,
    base_url: String,
    tokens: TokenCache,
    rate_limiter: DirectRateLimiter,
    recommendation_query: String,
    recommendation_limit: u32,
}

/// Free-text query Spotify is searched with.
pub fn search_query(title: &str, artist: &str) -> String {
    format!("{} {}", title.trim(), artist.trim())
        .trim()
        .to_string()
}

impl SpotifyCatalogClient {
    pub fn new(
        credentials: SpotifyCredentials,
        base_url: String,
        token_url: String,
        requests_per_second: u32,
    ) -> Self {
        let per_second = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: TokenCache::new(credentials, token_url),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
            recommendation_query: "K-Pop".to_string(),
            recommendation_limit: 4,
        }
    }

    /// Playlist search and track count used for recommendations.
    pub fn with_recommendations(mut self, query: impl Into<String>, limit: u32) -> Self {
        self.recommendation_query = query.into();
        self.recommendation_limit = limit.max(1);
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.spotify_credentials()?,
            config.spotify.api_base_url.clone(),
            config.spotify.token_url.clone(),
            config.spotify.requests_per_second,
        )
        .with_recommendations(
            config.spotify.recommendation_query.clone(),
            config.spotify.recommendation_limit,
        ))
    }

    /// Authenticated, rate limited GET against the Web API.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let token = self
            .tokens
            .access_token(&self.client)
            .await
            .wrap_err("Failed to get Spotify access token")?;

        log::debug!("Waiting for Spotify rate limiter");
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        self.client
            .get(&url)
            .query(query)
            .bearer_auth(&token)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .wrap_err_with(|| format!("Failed to send Spotify request to {}", path))?
            .error_for_status()
            .wrap_err_with(|| format!("Spotify request to {} failed", path))?
            .json()
            .await
            .wrap_err_with(|| format!("Failed to parse Spotify response from {}", path))
    }
}

#[async_trait::async_trait]
impl TrackSearch for SpotifyCatalogClient {
    async fn best_match(&self, title: &str, artist: &str) -> Result<Option<TrackMatch>> {
        let query = search_query(title, artist);
        if query.is_empty() {
            return Ok(None);
        }

        log::debug!("Searching Spotify for '{}'", query);
        let response: SpotifySearchResponse = self
            .get_json(
                "/search",
                &[("q", query.as_str()), ("type", "track"), ("limit", "1")],
            )
            .await
            .wrap_err_with(|| format!("Spotify search failed for '{}'", query))?;

        let track = response.into_first_track().map(TrackMatch::from);
        match &track {
            Some(track) => log::debug!(
                "Spotify match for '{}': {} (isrc: {:?})",
                query,
                track.name,
                track.isrc
            ),
            None => log::debug!("No Spotify match for '{}'", query),
        }
        Ok(track)
    }
}

#[async_trait::async_trait]
impl PlaylistRecommendations for SpotifyCatalogClient {
    async fn recommendations(&self) -> Result<Vec<RecommendedTrack>> {
        let playlists: SpotifyPlaylistSearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", self.recommendation_query.as_str()),
                    ("type", "playlist"),
                    ("limit", "1"),
                ],
            )
            .await
            .wrap_err("Cannot get recommended tracks")?;

        let Some(playlist) = playlists.into_first_playlist() else {
            log::info!("No playlist found for '{}'", self.recommendation_query);
            return Ok(Vec::new());
        };

        let limit = self.recommendation_limit.to_string();
        let tracks: SpotifyPlaylistTracksResponse = self
            .get_json(
                &format!("/playlists/{}/tracks", playlist.id),
                &[("limit", limit.as_str())],
            )
            .await
            .wrap_err_with(|| format!("Failed to fetch tracks of playlist {}", playlist.id))?;

        let tracks = tracks.into_tracks();
        log::debug!(
            "{} recommended tracks from playlist {}",
            tracks.len(),
            playlist.id
        );
        Ok(tracks)
    }
}
