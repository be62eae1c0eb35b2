use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::Context;
use reqwest::Client;

use crate::config::Config;
use crate::ports::youtube::{VideoSearchPage, YoutubeApi};
use crate::services::youtube::types::{SearchListResponse, VideoListResponse};

/// YouTube Data API v3 client authenticated with an API key.
pub struct YoutubeDataClient {
    client: Client,
    api_key: String,
    base_url: String,
    search_max_results: u32,
}

impl YoutubeDataClient {
    pub fn new(api_key: String, base_url: String, search_max_results: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            search_max_results,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.youtube_api_key()?,
            config.youtube.api_base_url.clone(),
            config.youtube.search_max_results,
        ))
    }
}

#[async_trait::async_trait]
impl YoutubeApi for YoutubeDataClient {
    async fn video_description(&self, video_id: &str) -> Result<Option<String>> {
        let url = format!("{}/videos", self.base_url);
        log::debug!("Fetching YouTube video snippet for {}", video_id);

        let response: VideoListResponse = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .wrap_err_with(|| format!("Failed to send YouTube videos request for {}", video_id))?
            .error_for_status()
            .wrap_err_with(|| format!("YouTube videos request failed for {}", video_id))?
            .json()
            .await
            .wrap_err("Failed to parse YouTube videos response")?;

        let description = response.into_description();
        log::debug!(
            "Video {} description: {} bytes",
            video_id,
            description.as_ref().map_or(0, String::len)
        );
        Ok(description)
    }

    async fn search_videos(&self, query: &str) -> Result<VideoSearchPage> {
        let url = format!("{}/search", self.base_url);
        let max_results = self.search_max_results.to_string();
        log::debug!("Searching YouTube for '{}'", query);

        let response: SearchListResponse = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .wrap_err("Failed to send YouTube search request")?
            .error_for_status()
            .wrap_err("YouTube search request failed")?
            .json()
            .await
            .wrap_err("Failed to parse YouTube search response")?;

        let page = VideoSearchPage::from(response);
        log::info!(
            "YouTube search for '{}' returned {} results",
            query,
            page.results.len()
        );
        Ok(page)
    }
}
