//! The credential manager: the single entry point the rest of the server uses
//! to obtain a usable bearer token.
//!
//! Every request re-loads the persisted record, checks expiry locally, and
//! only hits the token endpoint when the access token is stale. A refresh in
//! flight is never duplicated: callers serialize on one lock, so the second
//! caller re-reads the record and sees the token the first one just obtained.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::{AuthError, AuthResult};
use super::refresher::{RefreshError, TokenEndpoint};
use super::store::CredentialStore;

/// Treat a token as expired this long before its literal deadline, absorbing
/// clock skew and in-flight request latency.
pub const EXPIRY_SKEW_MS: i64 = 30_000;

/// Façade guaranteeing callers always receive a currently-valid access token.
pub struct CredentialManager {
    store: CredentialStore,
    endpoint: Arc<dyn TokenEndpoint>,

    /// Coordination point for the refresh path; see module docs.
    gate: Mutex<()>,
}

impl CredentialManager {
    pub fn new(store: CredentialStore, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self {
            store,
            endpoint,
            gate: Mutex::new(()),
        }
    }

    /// The store this manager persists through.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Obtain a currently-valid access token, refreshing transparently.
    ///
    /// The common path is cheap: load the record, see a future expiry, return
    /// the cached token with no network call. On the stale path the refresh
    /// result is persisted before the token is returned, so an unsaved token
    /// can never be silently lost on the next load.
    pub async fn get_valid_credential(&self) -> AuthResult<String> {
        let _gate = self.gate.lock().await;

        let mut record = self.store.load()?;
        if !record.is_bootstrapped() {
            return Err(AuthError::NotBootstrapped);
        }

        let now_ms = Utc::now().timestamp_millis();
        if !record.is_expired_at(now_ms, EXPIRY_SKEW_MS) {
            debug!("access token still valid");
            if let Some(token) = record.access_token.clone() {
                return Ok(token);
            }
        }

        // Expired without a refresh token: only an interactive re-bootstrap
        // can recover.
        let Some(refresh_token) = record.refresh_token.clone() else {
            return Err(AuthError::AuthExpired);
        };

        info!("access token expired, refreshing");
        let grant = self
            .endpoint
            .refresh(&record.client_id, &record.client_secret, &refresh_token)
            .await
            .map_err(|err| match err {
                RefreshError::Rejected(_) => AuthError::AuthExpired,
                RefreshError::Network(msg) => AuthError::Network(msg),
                RefreshError::InvalidResponse(msg) => AuthError::InvalidResponse(msg),
            })?;

        let now_ms = Utc::now().timestamp_millis();
        record.apply_grant(&grant, now_ms);
        self.store.save(&record)?;
        debug!("refreshed token persisted");

        record
            .access_token
            .ok_or_else(|| AuthError::InvalidResponse("grant carried no access token".to_string()))
    }
}
