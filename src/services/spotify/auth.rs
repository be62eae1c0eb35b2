use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::SpotifyCredentials;
use crate::services::spotify::types::SpotifyTokenResponse;

/// Tokens are refreshed this long before Spotify says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientCredentialsError {
    #[error("Spotify rejected the client credentials: {reason}")]
    Rejected { reason: String },
    #[error("Failed to send http request: {0}")]
    FailedToSendRequest(reqwest::Error),
    #[error("Failed to parse response: {0}")]
    FailedToParseResponse(reqwest::Error),
}

/// Request an app access token with the client-credentials grant
/// https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow
pub async fn request_client_credentials_token(
    client: &reqwest::Client,
    token_url: &str,
    credentials: &SpotifyCredentials,
) -> Result<SpotifyTokenResponse, ClientCredentialsError> {
    let response = client
        .post(token_url)
        // Serialized as x-www-form-urlencoded, as required by spotify
        .form(&[("grant_type", "client_credentials")])
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(ClientCredentialsError::FailedToSendRequest)?;

    if !response.status().is_success() {
        return Err(ClientCredentialsError::Rejected {
            reason: response
                .text()
                .await
                .unwrap_or("Failed to get error text".to_string()),
        });
    }

    response
        .json()
        .await
        .map_err(ClientCredentialsError::FailedToParseResponse)
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Shared app token, fetched lazily and reused until shortly before expiry.
pub struct TokenCache {
    credentials: SpotifyCredentials,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(credentials: SpotifyCredentials, token_url: String) -> Self {
        Self {
            credentials,
            token_url,
            cached: Mutex::new(None),
        }
    }

    pub async fn access_token(
        &self,
        client: &reqwest::Client,
    ) -> Result<String, ClientCredentialsError> {
        // Held across the request so concurrent lookups share one token fetch
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.access_token.clone());
        }

        log::debug!("Requesting new Spotify access token");
        let response =
            request_client_credentials_token(client, &self.token_url, &self.credentials).await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: response.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(response.access_token)
    }
}
