use color_eyre::eyre::Result;

/// Best Spotify match for a song, decoupled from the API payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub duration_ms: Option<i64>,
    pub isrc: Option<String>,
}

/// Port trait wrapping the Spotify track search used to resolve ISRCs.
///
/// Implementations live in `spotify::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackSearch: Send + Sync {
    /// The single best match for a title/artist pair, if Spotify has one.
    async fn best_match(&self, title: &str, artist: &str) -> Result<Option<TrackMatch>>;
}

/// A track from the playlist that backs the recommendations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendedTrack {
    pub name: String,
    pub artists: Vec<String>,
    pub album_image: Option<String>,
    pub preview_url: Option<String>,
    pub duration_ms: Option<i64>,
}

/// Port trait for the playlist-backed track recommendations.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistRecommendations: Send + Sync {
    /// The first tracks of the top playlist for the configured search.
    /// Empty when the search finds no playlist.
    async fn recommendations(&self) -> Result<Vec<RecommendedTrack>>;
}
