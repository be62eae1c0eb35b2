use color_eyre::eyre::Result;
use serde::Serialize;

/// Decoupled representation of a YouTube search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSearchResult {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: Option<String>,
    pub published_at: String,
}

/// One page of YouTube search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSearchPage {
    pub results: Vec<VideoSearchResult>,
    pub total_results: u64,
    pub next_page_token: Option<String>,
}

/// Port trait wrapping the YouTube Data API calls used by business logic.
///
/// Implementations live in `youtube::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait YoutubeApi: Send + Sync {
    /// Free-text description of a video, `None` when the video does not exist.
    async fn video_description(&self, video_id: &str) -> Result<Option<String>>;

    async fn search_videos(&self, query: &str) -> Result<VideoSearchPage>;
}
