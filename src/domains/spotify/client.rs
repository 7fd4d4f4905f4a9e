//! Thin async client for the Spotify Web API.
//!
//! Every request asks the credential manager for a currently-valid access
//! token first, so expired tokens are refreshed transparently and no request
//! is ever attempted with a token past its validity window.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::core::auth::CredentialManager;

use super::error::SpotifyError;
use super::models::{
    CursorPage, Page, PlayHistory, PlaybackState, Playlist, PlaylistItem, PrivateUser,
    QueueResponse, SearchResponse,
};

/// Error envelope the Web API wraps failures in:
/// `{"error": {"status": 404, "message": "No active device found"}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Spotify Web API client.
pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialManager>,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<CredentialManager>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// The credential manager backing this client.
    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, SpotifyError> {
        let token = self.credentials.get_valid_credential().await?;

        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, path);

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorEnvelope>(&raw) {
            Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
            _ => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(SpotifyError::api(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let response = self.send(Method::GET, path, query, None).await?;
        response
            .json()
            .await
            .map_err(|err| SpotifyError::InvalidResponse(err.to_string()))
    }

    /// GET that may legitimately answer 204 with no body.
    async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, SpotifyError> {
        let response = self.send(Method::GET, path, &[], None).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        response
            .json()
            .await
            .map(Some)
            .map_err(|err| SpotifyError::InvalidResponse(err.to_string()))
    }

    /// Request where success carries no useful body (playback control).
    async fn send_no_content(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<(), SpotifyError> {
        self.send(method, path, query, body).await.map(|_| ())
    }

    fn device_query(device_id: Option<&str>) -> Vec<(&'static str, String)> {
        device_id
            .map(|id| vec![("device_id", id.to_string())])
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Search the catalog. `kind` is one of `track`, `album`, `artist`,
    /// `playlist`.
    pub async fn search(
        &self,
        query: &str,
        kind: &str,
        limit: usize,
    ) -> Result<SearchResponse, SpotifyError> {
        self.get_json(
            "/search",
            &[
                ("q", query.to_string()),
                ("type", kind.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    /// Current playback state; `None` when nothing is playing.
    pub async fn playback_state(&self) -> Result<Option<PlaybackState>, SpotifyError> {
        self.get_optional_json("/me/player").await
    }

    /// Start or resume playback, optionally of a specific context or track
    /// list, optionally on a specific device.
    pub async fn play(
        &self,
        device_id: Option<&str>,
        context_uri: Option<&str>,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        let mut body = serde_json::Map::new();
        if let Some(context_uri) = context_uri {
            body.insert("context_uri".to_string(), json!(context_uri));
        }
        if !uris.is_empty() {
            body.insert("uris".to_string(), json!(uris));
        }
        let body = if body.is_empty() {
            None
        } else {
            Some(serde_json::Value::Object(body))
        };
        self.send_no_content(
            Method::PUT,
            "/me/player/play",
            &Self::device_query(device_id),
            body,
        )
        .await
    }

    pub async fn pause(&self, device_id: Option<&str>) -> Result<(), SpotifyError> {
        self.send_no_content(
            Method::PUT,
            "/me/player/pause",
            &Self::device_query(device_id),
            None,
        )
        .await
    }

    pub async fn next_track(&self, device_id: Option<&str>) -> Result<(), SpotifyError> {
        self.send_no_content(
            Method::POST,
            "/me/player/next",
            &Self::device_query(device_id),
            None,
        )
        .await
    }

    pub async fn previous_track(&self, device_id: Option<&str>) -> Result<(), SpotifyError> {
        self.send_no_content(
            Method::POST,
            "/me/player/previous",
            &Self::device_query(device_id),
            None,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Queue
    // ------------------------------------------------------------------

    pub async fn add_to_queue(
        &self,
        uri: &str,
        device_id: Option<&str>,
    ) -> Result<(), SpotifyError> {
        let mut query = vec![("uri", uri.to_string())];
        query.extend(Self::device_query(device_id));
        self.send_no_content(Method::POST, "/me/player/queue", &query, None)
            .await
    }

    pub async fn queue(&self) -> Result<QueueResponse, SpotifyError> {
        self.get_json("/me/player/queue", &[]).await
    }

    // ------------------------------------------------------------------
    // Playlists
    // ------------------------------------------------------------------

    pub async fn current_user_playlists(
        &self,
        limit: usize,
    ) -> Result<Page<Playlist>, SpotifyError> {
        self.get_json("/me/playlists", &[("limit", limit.to_string())])
            .await
    }

    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> Result<Page<PlaylistItem>, SpotifyError> {
        self.get_json(
            &format!("/playlists/{}/tracks", playlist_id),
            &[("limit", limit.to_string())],
        )
        .await
    }

    pub async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
        public: bool,
    ) -> Result<Playlist, SpotifyError> {
        let user = self.current_user().await?;
        let response = self
            .send(
                Method::POST,
                &format!("/users/{}/playlists", user.id),
                &[],
                Some(json!({
                    "name": name,
                    "description": description.unwrap_or_default(),
                    "public": public,
                })),
            )
            .await?;
        response
            .json()
            .await
            .map_err(|err| SpotifyError::InvalidResponse(err.to_string()))
    }

    pub async fn add_items_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        self.send_no_content(
            Method::POST,
            &format!("/playlists/{}/tracks", playlist_id),
            &[],
            Some(json!({ "uris": uris })),
        )
        .await
    }

    // ------------------------------------------------------------------
    // History and profile
    // ------------------------------------------------------------------

    pub async fn recently_played(
        &self,
        limit: usize,
    ) -> Result<CursorPage<PlayHistory>, SpotifyError> {
        self.get_json("/me/player/recently-played", &[("limit", limit.to_string())])
            .await
    }

    pub async fn current_user(&self) -> Result<PrivateUser, SpotifyError> {
        self.get_json("/me", &[]).await
    }
}
