//! One-time interactive authorization bootstrap.
//!
//! Exchanges a user-approved authorization code for the first token pair and
//! seeds the store. The store is not touched unless the full exchange
//! succeeds, so a failed bootstrap never leaves partial state behind.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::error::{AuthError, AuthResult};
use super::record::CredentialRecord;
use super::refresher::{RefreshError, TokenEndpoint};
use super::store::CredentialStore;

/// Spotify user-consent endpoint.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

/// Scopes requested during authorization; covers every tool in the catalog.
pub const SCOPES: &str = "user-read-playback-state user-modify-playback-state \
                          user-read-currently-playing user-read-recently-played \
                          playlist-read-private playlist-modify-private playlist-modify-public";

/// Performs the authorization-code exchange that establishes the first
/// token pair.
pub struct AuthBootstrapper {
    store: CredentialStore,
    endpoint: Arc<dyn TokenEndpoint>,
    authorize_url: String,
}

impl AuthBootstrapper {
    pub fn new(store: CredentialStore, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self {
            store,
            endpoint,
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
        }
    }

    /// Override the consent endpoint.
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// Build the consent URL the user must open in a browser.
    pub fn authorize_url(&self) -> AuthResult<String> {
        let record = self.store.load()?;
        let query = serde_urlencoded::to_string([
            ("client_id", record.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", record.redirect_uri.as_str()),
            ("scope", SCOPES),
        ])
        .map_err(|err| AuthError::AuthorizationFailed(err.to_string()))?;
        Ok(format!("{}?{}", self.authorize_url, query))
    }

    /// Exchange the pasted authorization code for the first token pair and
    /// write a fresh record, fully replacing any prior token state.
    pub async fn exchange(&self, code: &str) -> AuthResult<()> {
        let record = self.store.load()?;

        let grant = self
            .endpoint
            .exchange_code(
                &record.client_id,
                &record.client_secret,
                &record.redirect_uri,
                code,
            )
            .await
            .map_err(|err| match err {
                RefreshError::Network(msg) => AuthError::Network(msg),
                RefreshError::Rejected(msg) | RefreshError::InvalidResponse(msg) => {
                    AuthError::AuthorizationFailed(msg)
                }
            })?;

        let mut fresh = CredentialRecord {
            access_token: None,
            refresh_token: None,
            expires_at: None,
            ..record
        };
        fresh.apply_grant(&grant, Utc::now().timestamp_millis());
        self.store.save(&fresh)?;

        info!("authorization complete, credentials saved to {:?}", self.store.path());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::core::auth::record::ClientIdentity;
    use crate::core::auth::refresher::TokenGrant;

    struct FakeEndpoint {
        result: Result<TokenGrant, &'static str>,
    }

    #[async_trait]
    impl TokenEndpoint for FakeEndpoint {
        async fn refresh(
            &self,
            _client_id: &str,
            _client_secret: &str,
            _refresh_token: &str,
        ) -> Result<TokenGrant, RefreshError> {
            unreachable!("bootstrap never refreshes")
        }

        async fn exchange_code(
            &self,
            _client_id: &str,
            _client_secret: &str,
            redirect_uri: &str,
            code: &str,
        ) -> Result<TokenGrant, RefreshError> {
            assert_eq!(redirect_uri, "http://127.0.0.1:8888/callback");
            assert_eq!(code, "the-code");
            match &self.result {
                Ok(grant) => Ok(grant.clone()),
                Err(msg) => Err(RefreshError::Rejected(msg.to_string())),
            }
        }
    }

    fn identity() -> ClientIdentity {
        ClientIdentity {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        }
    }

    fn temp_store() -> (TempDir, CredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::with_identity(dir.path().join("credentials.json"), identity());
        (dir, store)
    }

    #[tokio::test]
    async fn test_exchange_seeds_store_with_fresh_record() {
        let (_dir, store) = temp_store();
        let endpoint = Arc::new(FakeEndpoint {
            result: Ok(TokenGrant {
                access_token: "A1".to_string(),
                expires_in: 3600,
                refresh_token: Some("R1".to_string()),
            }),
        });
        let bootstrapper = AuthBootstrapper::new(store.clone(), endpoint);

        let before = Utc::now().timestamp_millis();
        bootstrapper.exchange("the-code").await.unwrap();

        let record = store.load().unwrap();
        assert_eq!(record.access_token.as_deref(), Some("A1"));
        assert_eq!(record.refresh_token.as_deref(), Some("R1"));
        assert!(record.expires_at.unwrap() >= before + 3_600_000);
    }

    #[tokio::test]
    async fn test_exchange_replaces_prior_token_state() {
        let (_dir, store) = temp_store();
        let mut stale = store.load().unwrap();
        stale.access_token = Some("OLD".to_string());
        stale.refresh_token = Some("OLD_R".to_string());
        stale.expires_at = Some(1);
        store.save(&stale).unwrap();

        let endpoint = Arc::new(FakeEndpoint {
            result: Ok(TokenGrant {
                access_token: "A1".to_string(),
                expires_in: 3600,
                refresh_token: Some("R1".to_string()),
            }),
        });
        AuthBootstrapper::new(store.clone(), endpoint)
            .exchange("the-code")
            .await
            .unwrap();

        let record = store.load().unwrap();
        assert_eq!(record.access_token.as_deref(), Some("A1"));
        assert_eq!(record.refresh_token.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_failed_exchange_persists_nothing() {
        let (_dir, store) = temp_store();
        let endpoint = Arc::new(FakeEndpoint {
            result: Err("invalid_grant"),
        });
        let bootstrapper = AuthBootstrapper::new(store.clone(), endpoint);

        let err = bootstrapper.exchange("the-code").await.unwrap_err();
        assert!(matches!(err, AuthError::AuthorizationFailed(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_authorize_url_carries_identity_and_scopes() {
        let (_dir, store) = temp_store();
        let endpoint = Arc::new(FakeEndpoint {
            result: Err("unused"),
        });
        let bootstrapper = AuthBootstrapper::new(store, endpoint)
            .with_authorize_url("https://accounts.example/authorize");

        let url = bootstrapper.authorize_url().unwrap();
        assert!(url.starts_with("https://accounts.example/authorize?"));
        assert!(url.contains("client_id=id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("user-read-playback-state"));
    }
}
