use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::ports::spotify::TrackSearch;
use crate::ports::youtube::YoutubeApi;
use crate::timeline::{SongEntry, TimelineExtractor};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Video ID or extracted songs list is required")]
    MissingInput,
    #[error("No songs found in the provided video or list")]
    NoSongs,
}

/// Songs to resolve: taken from a video's description, given directly, or both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsrcLookupRequest {
    pub video_id: Option<String>,
    pub extracted_songs: Option<Vec<SongEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsrcLookup {
    pub songs: Vec<SongEntry>,
    pub isrc_list: Vec<String>,
    pub youtube_search_query: String,
}

/// YouTube results page for a search query.
pub fn youtube_search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

/// `M:SS` rendering of a track length.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

/// Extracts songs from video descriptions and resolves them to ISRCs.
pub struct IsrcLookupService {
    youtube: Arc<dyn YoutubeApi>,
    tracks: Arc<dyn TrackSearch>,
    extractor: TimelineExtractor,
}

impl IsrcLookupService {
    pub fn new(
        youtube: Arc<dyn YoutubeApi>,
        tracks: Arc<dyn TrackSearch>,
        extractor: TimelineExtractor,
    ) -> Self {
        Self {
            youtube,
            tracks,
            extractor,
        }
    }

    /// Songs listed in a video's description. A failed fetch yields no songs.
    pub async fn songs_from_video(&self, video_id: &str) -> Vec<SongEntry> {
        match self.youtube.video_description(video_id).await {
            Ok(description) => self.extractor.extract(description.as_deref()),
            Err(e) => {
                log::error!("Failed to fetch description for video {}: {:?}", video_id, e);
                Vec::new()
            }
        }
    }

    /// Look up the ISRC of every song; songs that fail keep `isrc: None`.
    pub async fn resolve_songs(&self, songs: Vec<SongEntry>) -> Vec<SongEntry> {
        let tasks = songs.into_iter().map(|song| async move {
            match self.tracks.best_match(&song.title, &song.artist).await {
                Ok(track) => SongEntry {
                    isrc: track.and_then(|t| t.isrc),
                    ..song
                },
                Err(e) => {
                    log::warn!(
                        "Error getting ISRC for {} by {}: {:?}",
                        song.title,
                        song.artist,
                        e
                    );
                    song
                }
            }
        });

        join_all(tasks).await
    }

    pub async fn lookup(&self, request: IsrcLookupRequest) -> Result<IsrcLookup, LookupError> {
        if request.video_id.is_none() && request.extracted_songs.is_none() {
            return Err(LookupError::MissingInput);
        }

        let mut songs = Vec::new();
        if let Some(video_id) = &request.video_id {
            songs.extend(self.songs_from_video(video_id).await);
            log::debug!("Extracted {} songs from video {}", songs.len(), video_id);
        }
        if let Some(extracted) = request.extracted_songs {
            songs.extend(extracted);
        }

        if songs.is_empty() {
            return Err(LookupError::NoSongs);
        }

        let songs = self.resolve_songs(songs).await;
        let isrc_list: Vec<String> = songs.iter().filter_map(|s| s.isrc.clone()).collect();
        let youtube_search_query = isrc_list.join(" OR ");

        log::info!(
            "Resolved {} of {} songs to ISRCs",
            isrc_list.len(),
            songs.len()
        );

        Ok(IsrcLookup {
            songs,
            isrc_list,
            youtube_search_query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::spotify::{MockTrackSearch, TrackMatch};
    use crate::ports::youtube::MockYoutubeApi;
    use color_eyre::eyre::eyre;

    fn track(isrc: Option<&str>) -> TrackMatch {
        TrackMatch {
            id: "id".into(),
            name: "name".into(),
            artists: vec![],
            duration_ms: Some(180_000),
            isrc: isrc.map(str::to_string),
        }
    }

    fn isrc_for(title: &str) -> Option<&'static str> {
        match title {
            "Song A" => Some("KRA000000001"),
            "Song B" => Some("KRA000000002"),
            _ => None,
        }
    }

    fn service(youtube: MockYoutubeApi, tracks: MockTrackSearch) -> IsrcLookupService {
        IsrcLookupService::new(
            Arc::new(youtube),
            Arc::new(tracks),
            TimelineExtractor::default(),
        )
    }

    #[tokio::test]
    async fn test_missing_input() {
        let service = service(MockYoutubeApi::new(), MockTrackSearch::new());
        let result = service.lookup(IsrcLookupRequest::default()).await;
        assert_eq!(result, Err(LookupError::MissingInput));
    }

    #[tokio::test]
    async fn test_video_songs_are_resolved_in_order() {
        let mut youtube = MockYoutubeApi::new();
        youtube
            .expect_video_description()
            .times(1)
            .returning(|video_id| {
                assert_eq!(video_id, "abc");
                Ok(Some(
                    "Tracklist\n0:00 Song A | Artist A\n3:00 Unknown\n6:00 Artist B - Song B"
                        .to_string(),
                ))
            });

        let mut tracks = MockTrackSearch::new();
        tracks
            .expect_best_match()
            .times(3)
            .returning(|title, _artist| Ok(Some(track(isrc_for(title)))));

        let result = service(youtube, tracks)
            .lookup(IsrcLookupRequest {
                video_id: Some("abc".into()),
                extracted_songs: None,
            })
            .await
            .unwrap();

        let titles: Vec<_> = result.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Song A", "Unknown", "Song B"]);
        assert_eq!(result.songs[1].isrc, None);
        assert_eq!(result.isrc_list, vec!["KRA000000001", "KRA000000002"]);
        assert_eq!(result.youtube_search_query, "KRA000000001 OR KRA000000002");
    }

    #[tokio::test]
    async fn test_extracted_songs_follow_video_songs() {
        let mut youtube = MockYoutubeApi::new();
        youtube
            .expect_video_description()
            .returning(|_| Ok(Some("0:00 Song A | Artist A".to_string())));

        let mut tracks = MockTrackSearch::new();
        tracks
            .expect_best_match()
            .returning(|title, _| Ok(Some(track(isrc_for(title)))));

        let result = service(youtube, tracks)
            .lookup(IsrcLookupRequest {
                video_id: Some("abc".into()),
                extracted_songs: Some(vec![SongEntry::new("Song B", "Artist B")]),
            })
            .await
            .unwrap();

        assert_eq!(
            result.songs,
            vec![
                SongEntry {
                    isrc: Some("KRA000000001".into()),
                    ..SongEntry::new("Song A", "Artist A")
                },
                SongEntry {
                    isrc: Some("KRA000000002".into()),
                    ..SongEntry::new("Song B", "Artist B")
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_video_fetch_with_no_other_songs() {
        let mut youtube = MockYoutubeApi::new();
        youtube
            .expect_video_description()
            .returning(|_| Err(eyre!("quota exceeded")));

        let result = service(youtube, MockTrackSearch::new())
            .lookup(IsrcLookupRequest {
                video_id: Some("abc".into()),
                extracted_songs: None,
            })
            .await;

        assert_eq!(result, Err(LookupError::NoSongs));
    }

    #[tokio::test]
    async fn test_video_without_timeline_has_no_songs() {
        let mut youtube = MockYoutubeApi::new();
        youtube
            .expect_video_description()
            .returning(|_| Ok(Some("Thanks for watching!".to_string())));

        let result = service(youtube, MockTrackSearch::new())
            .lookup(IsrcLookupRequest {
                video_id: Some("abc".into()),
                extracted_songs: Some(vec![]),
            })
            .await;

        assert_eq!(result, Err(LookupError::NoSongs));
    }

    #[tokio::test]
    async fn test_search_failure_keeps_song_without_isrc() {
        let mut tracks = MockTrackSearch::new();
        tracks.expect_best_match().returning(|title, _| {
            if title == "Song A" {
                Err(eyre!("rate limited"))
            } else {
                Ok(Some(track(isrc_for(title))))
            }
        });

        let result = service(MockYoutubeApi::new(), tracks)
            .lookup(IsrcLookupRequest {
                video_id: None,
                extracted_songs: Some(vec![
                    SongEntry::new("Song A", "Artist A"),
                    SongEntry::new("Song B", "Artist B"),
                ]),
            })
            .await
            .unwrap();

        assert_eq!(result.songs[0], SongEntry::new("Song A", "Artist A"));
        assert_eq!(result.isrc_list, vec!["KRA000000002"]);
        assert_eq!(result.youtube_search_query, "KRA000000002");
    }

    #[tokio::test]
    async fn test_no_match_leaves_isrc_empty() {
        let mut tracks = MockTrackSearch::new();
        tracks.expect_best_match().returning(|_, _| Ok(None));

        let result = service(MockYoutubeApi::new(), tracks)
            .lookup(IsrcLookupRequest {
                video_id: None,
                extracted_songs: Some(vec![SongEntry::new("Obscure", "")]),
            })
            .await
            .unwrap();

        assert!(result.isrc_list.is_empty());
        assert_eq!(result.youtube_search_query, "");
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: IsrcLookupRequest = serde_json::from_value(serde_json::json!({
            "videoId": "abc",
            "extractedSongs": [{ "title": "Song", "artist": "Artist" }]
        }))
        .unwrap();

        assert_eq!(request.video_id.as_deref(), Some("abc"));
        assert_eq!(
            request.extracted_songs,
            Some(vec![SongEntry::new("Song", "Artist")])
        );
    }

    #[test]
    fn test_youtube_search_url() {
        assert_eq!(
            youtube_search_url("KRA000000001 OR KRA000000002"),
            "https://www.youtube.com/results?search_query=KRA000000001%20OR%20KRA000000002"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(5_000), "0:05");
        assert_eq!(format_duration(222_075), "3:42");
        assert_eq!(format_duration(3_600_000), "60:00");
    }
}
