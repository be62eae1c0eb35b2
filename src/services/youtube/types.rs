use serde::Deserialize;

use crate::ports::youtube::{VideoSearchPage, VideoSearchResult};

/// Response of `GET /videos?part=snippet`
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub snippet: Option<VideoSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSnippet {
    pub description: Option<String>,
}

/// Response of `GET /search?part=snippet&type=video`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    pub page_info: Option<PageInfo>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl VideoListResponse {
    /// Description of the first returned video.
    pub fn into_description(self) -> Option<String> {
        self.items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .and_then(|snippet| snippet.description)
    }
}

impl From<SearchListResponse> for VideoSearchPage {
    fn from(response: SearchListResponse) -> Self {
        let results = response
            .items
            .into_iter()
            .filter_map(|item| {
                // Channels and playlists have no video id
                let id = item.id.video_id?;
                let thumbnails = item.snippet.thumbnails;
                Some(VideoSearchResult {
                    id,
                    title: item.snippet.title,
                    channel_title: item.snippet.channel_title,
                    thumbnail_url: thumbnails.medium.or(thumbnails.default).map(|t| t.url),
                    published_at: item.snippet.published_at,
                })
            })
            .collect();

        VideoSearchPage {
            results,
            total_results: response
                .page_info
                .and_then(|info| info.total_results)
                .unwrap_or(0),
            next_page_token: response.next_page_token,
        }
    }
}
