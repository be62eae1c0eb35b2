use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub search_max_results: u32,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            search_max_results: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base_url: String,
    pub token_url: String,
    pub requests_per_second: u32,
    /// Playlist search whose first result supplies the recommended tracks
    pub recommendation_query: String,
    pub recommendation_limit: u32,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: "https://api.spotify.com/v1".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            requests_per_second: 5,
            recommendation_query: "K-Pop".to_string(),
            recommendation_limit: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Read `Title - Artist` instead of `Artist - Title` when the right side is Hangul.
    pub hangul_aware_dash: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub path: Option<String>,
}

/// Credentials for the Spotify client-credentials flow.
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

fn env_fallback(value: &Option<String>, key: &str) -> Option<String> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("plug").join("config.toml"))
    }

    /// Load the default config file, falling back to defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config file, if it doesn't exist
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| eyre!("No config directory available"))?;
        Self::default().write_if_missing(&path)?;
        Ok(path)
    }

    pub fn write_if_missing(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            log::info!("Config already exists at {}", path.display());
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).wrap_err("Failed to serialize config")?;
        std::fs::write(path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(true)
    }

    /// Expand ~ to home directory
    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    /// YouTube API key, from the config or `YOUTUBE_API_KEY`
    pub fn youtube_api_key(&self) -> Result<String> {
        env_fallback(&self.youtube.api_key, "YOUTUBE_API_KEY")
            .ok_or_else(|| eyre!("YouTube API key is not configured (set youtube.api_key or YOUTUBE_API_KEY)"))
    }

    /// Spotify credentials, from the config or `SPOTIFY_CLIENT_ID`/`SPOTIFY_CLIENT_SECRET`
    pub fn spotify_credentials(&self) -> Result<SpotifyCredentials> {
        let client_id = env_fallback(&self.spotify.client_id, "SPOTIFY_CLIENT_ID")
            .ok_or_else(|| eyre!("Spotify client id is not configured (set spotify.client_id or SPOTIFY_CLIENT_ID)"))?;
        let client_secret = env_fallback(&self.spotify.client_secret, "SPOTIFY_CLIENT_SECRET")
            .ok_or_else(|| eyre!("Spotify client secret is not configured (set spotify.client_secret or SPOTIFY_CLIENT_SECRET)"))?;
        Ok(SpotifyCredentials {
            client_id,
            client_secret,
        })
    }

    /// Where the session is persisted
    pub fn session_path(&self) -> Option<PathBuf> {
        match &self.session.path {
            Some(path) => Some(Self::expand_path(path)),
            None => dirs::data_dir().map(|path| path.join("plug").join("session.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(
            config.youtube.api_base_url,
            "https://www.googleapis.com/youtube/v3"
        );
        assert_eq!(config.youtube.search_max_results, 10);
        assert_eq!(config.spotify.requests_per_second, 5);
        assert_eq!(config.spotify.recommendation_query, "K-Pop");
        assert_eq!(config.spotify.recommendation_limit, 4);
        assert!(!config.timeline.hangul_aware_dash);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [youtube]
            api_key = "yt-key"

            [spotify]
            client_id = "id"
            client_secret = "secret"

            [timeline]
            hangul_aware_dash = true

            [session]
            path = "/tmp/plug-session.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.youtube_api_key().unwrap(), "yt-key");
        assert_eq!(config.youtube.search_max_results, 10);
        let credentials = config.spotify_credentials().unwrap();
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
        assert_eq!(config.spotify.token_url, "https://accounts.spotify.com/api/token");
        assert!(config.timeline.hangul_aware_dash);
        assert_eq!(
            config.session_path(),
            Some(PathBuf::from("/tmp/plug-session.json"))
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml("[youtube\napi_key = 1").is_err());
    }

    #[test]
    fn test_write_if_missing_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.timeline.hangul_aware_dash = true;
        assert!(config.write_if_missing(&path).unwrap());
        assert!(!Config::default().write_if_missing(&path).unwrap());

        let loaded = Config::from_file(&path).unwrap();
        assert!(loaded.timeline.hangul_aware_dash);
    }
}
