//! The persisted credential record.
//!
//! One JSON document holds the static client identity and the current token
//! state. The document on disk is the single source of truth; components pass
//! the record by value and never cache a credential beyond the current call.

use serde::{Deserialize, Serialize};

use super::refresher::TokenGrant;

/// Static application identity, set once at registration time.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// OAuth client id issued by the Spotify developer dashboard.
    pub client_id: String,

    /// OAuth client secret paired with the id.
    pub client_secret: String,

    /// Redirect URI registered for the application; used only during bootstrap
    /// and must match what was used to obtain the authorization code.
    pub redirect_uri: String,
}

/// Redact the secret from logs.
impl std::fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// The persisted unit of credential state.
///
/// Serialized with camelCase field names so the on-disk document stays
/// human-inspectable and matches the documented format:
/// `clientId`, `clientSecret`, `redirectUri`, `accessToken?`,
/// `refreshToken?`, `expiresAt?` (epoch milliseconds).
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default)]
    pub redirect_uri: String,

    /// Short-lived bearer credential; present once bootstrap succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Long-lived credential; the durable root of trust for the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiry of `access_token` in epoch milliseconds.
    /// Absent means "treat as expired", never "valid forever".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl CredentialRecord {
    /// Create an identity-only record with no tokens yet.
    pub fn from_identity(identity: ClientIdentity) -> Self {
        Self {
            client_id: identity.client_id,
            client_secret: identity.client_secret,
            redirect_uri: identity.redirect_uri,
            access_token: None,
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Whether any identity fields are present at all.
    pub fn has_identity(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Whether the bootstrap exchange has ever produced tokens.
    pub fn is_bootstrapped(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }

    /// Whether the access token must be treated as invalid at `now_ms`.
    ///
    /// A missing access token or a missing `expires_at` counts as expired.
    /// `skew_ms` shifts the deadline forward to absorb clock skew and
    /// in-flight request latency.
    pub fn is_expired_at(&self, now_ms: i64, skew_ms: i64) -> bool {
        if self.access_token.is_none() {
            return true;
        }
        match self.expires_at {
            Some(expires_at) => now_ms + skew_ms >= expires_at,
            None => true,
        }
    }

    /// Fold a token grant into the record.
    ///
    /// The access token and expiry are always overwritten; the refresh token
    /// is replaced only when the endpoint rotated it.
    pub fn apply_grant(&mut self, grant: &TokenGrant, now_ms: i64) {
        self.access_token = Some(grant.access_token.clone());
        self.expires_at = Some(now_ms + (grant.expires_in as i64) * 1000);
        if let Some(rotated) = &grant.refresh_token {
            self.refresh_token = Some(rotated.clone());
        }
    }
}

/// Redact secrets from logs.
impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ClientIdentity {
        ClientIdentity {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        }
    }

    #[test]
    fn test_identity_only_record_is_not_bootstrapped() {
        let record = CredentialRecord::from_identity(identity());
        assert!(record.has_identity());
        assert!(!record.is_bootstrapped());
        assert!(record.is_expired_at(0, 0));
    }

    #[test]
    fn test_missing_expiry_counts_as_expired() {
        let mut record = CredentialRecord::from_identity(identity());
        record.access_token = Some("A1".to_string());
        assert!(record.is_expired_at(0, 0));
    }

    #[test]
    fn test_future_expiry_is_valid_within_skew() {
        let mut record = CredentialRecord::from_identity(identity());
        record.access_token = Some("A1".to_string());
        record.expires_at = Some(100_000);
        assert!(!record.is_expired_at(0, 30_000));
        assert!(record.is_expired_at(70_000, 30_000));
        assert!(record.is_expired_at(100_001, 0));
    }

    #[test]
    fn test_apply_grant_overwrites_access_and_expiry() {
        let mut record = CredentialRecord::from_identity(identity());
        record.access_token = Some("A1".to_string());
        record.refresh_token = Some("R1".to_string());
        record.expires_at = Some(1_000);

        let grant = TokenGrant {
            access_token: "A2".to_string(),
            expires_in: 3600,
            refresh_token: None,
        };
        record.apply_grant(&grant, 5_000);

        assert_eq!(record.access_token.as_deref(), Some("A2"));
        assert_eq!(record.expires_at, Some(5_000 + 3_600_000));
        // Not rotated: previous refresh token retained.
        assert_eq!(record.refresh_token.as_deref(), Some("R1"));
    }

    #[test]
    fn test_apply_grant_rotates_refresh_token_when_supplied() {
        let mut record = CredentialRecord::from_identity(identity());
        record.refresh_token = Some("R1".to_string());

        let grant = TokenGrant {
            access_token: "A2".to_string(),
            expires_in: 3600,
            refresh_token: Some("R2".to_string()),
        };
        record.apply_grant(&grant, 0);
        assert_eq!(record.refresh_token.as_deref(), Some("R2"));
    }

    #[test]
    fn test_record_serializes_with_camel_case_fields() {
        let mut record = CredentialRecord::from_identity(identity());
        record.access_token = Some("A1".to_string());
        record.expires_at = Some(42);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["clientId"], "id");
        assert_eq!(json["accessToken"], "A1");
        assert_eq!(json["expiresAt"], 42);
        assert!(json.get("refreshToken").is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut record = CredentialRecord::from_identity(identity());
        record.access_token = Some("super_secret_token".to_string());
        let debug_str = format!("{:?}", record);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
        assert!(!debug_str.contains("secret\""));
    }
}
