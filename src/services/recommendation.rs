use std::sync::Arc;

use color_eyre::Result;
use serde::Serialize;

use crate::ports::spotify::{PlaylistRecommendations, RecommendedTrack};
use crate::services::isrc_lookup::format_duration;

/// A recommended track as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: String,
    /// Every credited artist, joined with `, `
    pub artist: String,
    pub album_image: Option<String>,
    pub preview_url: Option<String>,
    /// `M:SS`
    pub duration: Option<String>,
}

impl From<RecommendedTrack> for Recommendation {
    fn from(track: RecommendedTrack) -> Self {
        Recommendation {
            name: track.name,
            artist: track.artists.join(", "),
            album_image: track.album_image,
            preview_url: track.preview_url,
            duration: track.duration_ms.map(format_duration),
        }
    }
}

pub struct RecommendationService {
    spotify: Arc<dyn PlaylistRecommendations>,
}

impl RecommendationService {
    pub fn new(spotify: Arc<dyn PlaylistRecommendations>) -> Self {
        Self { spotify }
    }

    pub async fn recommend(&self) -> Result<Vec<Recommendation>> {
        let tracks = self.spotify.recommendations().await?;
        Ok(tracks.into_iter().map(Recommendation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::spotify::MockPlaylistRecommendations;
    use color_eyre::eyre::eyre;

    #[tokio::test]
    async fn test_tracks_are_rendered_in_playlist_order() {
        let mut spotify = MockPlaylistRecommendations::new();
        spotify.expect_recommendations().times(1).returning(|| {
            Ok(vec![
                RecommendedTrack {
                    name: "Super Shy".into(),
                    artists: vec!["NewJeans".into()],
                    album_image: Some("https://i.scdn.co/image/640".into()),
                    preview_url: Some("https://p.scdn.co/mp3-preview/1".into()),
                    duration_ms: Some(154_800),
                },
                RecommendedTrack {
                    name: "Seven".into(),
                    artists: vec!["Jung Kook".into(), "Latto".into()],
                    album_image: None,
                    preview_url: None,
                    duration_ms: None,
                },
            ])
        });

        let recommendations = RecommendationService::new(Arc::new(spotify))
            .recommend()
            .await
            .unwrap();

        assert_eq!(
            recommendations,
            vec![
                Recommendation {
                    name: "Super Shy".into(),
                    artist: "NewJeans".into(),
                    album_image: Some("https://i.scdn.co/image/640".into()),
                    preview_url: Some("https://p.scdn.co/mp3-preview/1".into()),
                    duration: Some("2:34".into()),
                },
                Recommendation {
                    name: "Seven".into(),
                    artist: "Jung Kook, Latto".into(),
                    album_image: None,
                    preview_url: None,
                    duration: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_spotify_failure_is_propagated() {
        let mut spotify = MockPlaylistRecommendations::new();
        spotify
            .expect_recommendations()
            .returning(|| Err(eyre!("401 Unauthorized")));

        let result = RecommendationService::new(Arc::new(spotify)).recommend().await;
        assert!(result.is_err());
    }

    #[test]
    fn test_recommendation_serializes_camel_case() {
        let json = serde_json::to_value(Recommendation {
            name: "Song".into(),
            artist: "Artist".into(),
            album_image: None,
            preview_url: Some("https://p.scdn.co/mp3-preview/1".into()),
            duration: Some("3:05".into()),
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "Song",
                "artist": "Artist",
                "albumImage": null,
                "previewUrl": "https://p.scdn.co/mp3-preview/1",
                "duration": "3:05",
            })
        );
    }
}
