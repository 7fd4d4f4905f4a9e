//! Token endpoint exchange.
//!
//! Converts a refresh token into a new access token (and, during bootstrap,
//! an authorization code into the first token pair). The exchange is behind
//! the [`TokenEndpoint`] trait so the manager and bootstrapper can be tested
//! without network access.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Spotify token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// A successful reply from the token endpoint.
///
/// The endpoint may or may not rotate the refresh token; when it supplies a
/// new one the caller must replace the previous value, otherwise the previous
/// refresh token is retained unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,

    /// Validity window in seconds.
    pub expires_in: u64,

    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Errors from a token endpoint exchange.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The endpoint reported the grant invalid or revoked (4xx with an OAuth
    /// error body). Not retryable.
    #[error("token endpoint rejected the grant: {0}")]
    Rejected(String),

    /// Transport failure or a server-side error. Retryable by the caller.
    #[error("network error: {0}")]
    Network(String),

    /// A reply we could not interpret.
    #[error("invalid token endpoint response: {0}")]
    InvalidResponse(String),
}

/// The remote exchange that turns grants into tokens.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange a refresh token for a new access token
    /// (`grant_type=refresh_token`).
    async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenGrant, RefreshError>;

    /// Exchange a user-approved authorization code for the first token pair
    /// (`grant_type=authorization_code`). `redirect_uri` must match exactly
    /// what was used to obtain the code.
    async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> Result<TokenGrant, RefreshError>;
}

/// OAuth error body: `{"error": "...", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthErrorBody {
    fn message(&self) -> String {
        match &self.error_description {
            Some(desc) => format!("{}: {}", self.error, desc),
            None => self.error.clone(),
        }
    }
}

/// Production [`TokenEndpoint`] over HTTPS.
///
/// The client authenticates with HTTP Basic (`base64(client_id:client_secret)`)
/// and posts a form-encoded body, per the Spotify accounts service contract.
pub struct HttpTokenEndpoint {
    http: reqwest::Client,
    token_url: String,
}

impl HttpTokenEndpoint {
    pub fn new(token_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
        }
    }

    fn basic_auth(client_id: &str, client_secret: &str) -> String {
        let raw = format!("{}:{}", client_id, client_secret);
        format!("Basic {}", BASE64.encode(raw.as_bytes()))
    }

    async fn post_form(
        &self,
        client_id: &str,
        client_secret: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenGrant, RefreshError> {
        let response = self
            .http
            .post(&self.token_url)
            .header("Authorization", Self::basic_auth(client_id, client_secret))
            .form(form)
            .send()
            .await
            .map_err(|err| RefreshError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let grant: TokenGrant = response
                .json()
                .await
                .map_err(|err| RefreshError::InvalidResponse(err.to_string()))?;
            debug!("token endpoint granted a token valid for {}s", grant.expires_in);
            return Ok(grant);
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            // 4xx with an OAuth error body means the grant itself is bad:
            // revoked refresh token, expired code, mismatched redirect URI.
            let message = match serde_json::from_str::<OAuthErrorBody>(&body) {
                Ok(oauth) => oauth.message(),
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            warn!("token endpoint rejected the grant: {}", message);
            return Err(RefreshError::Rejected(message));
        }

        // Server-side failure: retryable.
        Err(RefreshError::Network(format!(
            "token endpoint returned HTTP {}",
            status.as_u16()
        )))
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenGrant, RefreshError> {
        debug!("refreshing access token");
        self.post_form(
            client_id,
            client_secret,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }

    async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> Result<TokenGrant, RefreshError> {
        debug!("exchanging authorization code");
        self.post_form(
            client_id,
            client_secret,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
        )
        .await
    }
}
