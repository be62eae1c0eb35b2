use serde::{Deserialize, Serialize};

use crate::ports::spotify::{RecommendedTrack, TrackMatch};

/// Spotify client-credentials token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response of `GET /search?type=track`
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySearchResponse {
    pub tracks: Option<SpotifyTrackPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrackPage {
    #[serde(default)]
    pub items: Vec<SpotifyTrack>,
}

/// Spotify track from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub duration_ms: Option<i64>,
    pub external_ids: Option<SpotifyExternalIds>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyExternalIds {
    pub isrc: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
}

/// Response of `GET /search?type=playlist`
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistSearchResponse {
    pub playlists: Option<SpotifyPlaylistPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistPage {
    /// Spotify returns `null` in place of playlists it can no longer serve
    #[serde(default)]
    pub items: Vec<Option<SpotifyPlaylist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
}

/// Response of `GET /playlists/{id}/tracks`
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistTracksResponse {
    #[serde(default)]
    pub items: Vec<SpotifyPlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistItem {
    pub track: Option<SpotifyPlaylistTrack>,
}

/// Playlist entries can be local files, so there is no required id here.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistTrack {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
    pub preview_url: Option<String>,
    pub duration_ms: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

impl SpotifyPlaylistSearchResponse {
    pub fn into_first_playlist(self) -> Option<SpotifyPlaylist> {
        self.playlists?.items.into_iter().flatten().next()
    }
}

impl SpotifyPlaylistTracksResponse {
    pub fn into_tracks(self) -> Vec<RecommendedTrack> {
        self.items
            .into_iter()
            .filter_map(|item| item.track)
            .map(RecommendedTrack::from)
            .collect()
    }
}

impl From<SpotifyPlaylistTrack> for RecommendedTrack {
    fn from(track: SpotifyPlaylistTrack) -> Self {
        RecommendedTrack {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album_image: track
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
            preview_url: track.preview_url,
            duration_ms: track.duration_ms,
        }
    }
}

impl SpotifySearchResponse {
    pub fn into_first_track(self) -> Option<SpotifyTrack> {
        self.tracks?.items.into_iter().next()
    }
}

impl From<SpotifyTrack> for TrackMatch {
    fn from(track: SpotifyTrack) -> Self {
        TrackMatch {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            duration_ms: track.duration_ms,
            isrc: track.external_ids.and_then(|ids| ids.isrc),
        }
    }
}
