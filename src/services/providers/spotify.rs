/// Spotify Web API provider
///
/// Uses the client-credentials OAuth flow: a short-lived bearer token is
/// requested with the configured client ID/secret and cached until shortly
/// before expiry. Track lookups then pull the first album image off
/// `GET /v1/tracks/{id}`.
///
/// Constructed `disabled()` when no credentials are configured; in that mode
/// every lookup short-circuits to the no-credentials placeholder and nothing
/// touches the network.
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::services::providers::{
    TrackMetadataProvider, PLACEHOLDER_LOOKUP_FAILED, PLACEHOLDER_NO_CREDENTIALS,
    PLACEHOLDER_NO_IMAGE,
};

const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const API_URL: &str = "https://api.spotify.com/v1";

/// Refresh the cached token this many seconds before Spotify's stated expiry
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct ApiTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    album: ApiAlbum,
}

#[derive(Debug, Deserialize)]
struct ApiAlbum {
    #[serde(default)]
    images: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ApiImage {
    url: String,
}

#[derive(Debug, Clone)]
struct Credentials {
    client_id: String,
    client_secret: String,
}

#[derive(Debug)]
pub struct SpotifyProvider {
    http_client: HttpClient,
    credentials: Option<Credentials>,
    accounts_url: String,
    api_url: String,
    token: RwLock<Option<CachedToken>>,
}

impl SpotifyProvider {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            credentials: Some(Credentials {
                client_id,
                client_secret,
            }),
            accounts_url: ACCOUNTS_URL.to_string(),
            api_url: API_URL.to_string(),
            token: RwLock::new(None),
        }
    }

    /// Provider with no credentials: every lookup yields the placeholder
    pub fn disabled() -> Self {
        Self {
            http_client: HttpClient::new(),
            credentials: None,
            accounts_url: ACCOUNTS_URL.to_string(),
            api_url: API_URL.to_string(),
            token: RwLock::new(None),
        }
    }

    async fn access_token(&self, credentials: &Credentials) -> AppResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh() {
                return Ok(token.access_token.clone());
            }
        }

        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));
        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Basic {basic}"))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify token endpoint returned status {}: {}",
                status, body
            )));
        }

        let token: ApiTokenResponse = response.json().await?;
        let cached = CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now()
                + Duration::seconds((token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0)),
        };
        let access_token = cached.access_token.clone();
        *self.token.write().await = Some(cached);

        tracing::debug!(provider = "spotify", "Access token refreshed");
        Ok(access_token)
    }

    async fn fetch_track(&self, credentials: &Credentials, track_id: &str) -> AppResult<ApiTrack> {
        let token = self.access_token(credentials).await?;
        let url = format!("{}/tracks/{}", self.api_url, track_id);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Spotify returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

/// Largest album image, which the API lists first; placeholder when absent
fn first_image_url(track: &ApiTrack) -> String {
    track
        .album
        .images
        .first()
        .map(|image| image.url.clone())
        .unwrap_or_else(|| PLACEHOLDER_NO_IMAGE.to_string())
}

#[async_trait::async_trait]
impl TrackMetadataProvider for SpotifyProvider {
    async fn artwork_url(&self, track_id: &str) -> String {
        let Some(credentials) = &self.credentials else {
            return PLACEHOLDER_NO_CREDENTIALS.to_string();
        };

        match self.fetch_track(credentials, track_id).await {
            Ok(track) => first_image_url(&track),
            Err(e) => {
                tracing::warn!(
                    track_id = %track_id,
                    error = %e,
                    provider = "spotify",
                    "Track lookup failed"
                );
                PLACEHOLDER_LOOKUP_FAILED.to_string()
            }
        }
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}
