//! Credential lifecycle error types.
//!
//! Every failure kind is surfaced distinctly so callers can choose between
//! retrying (network), prompting for re-authorization (auth expired / not
//! bootstrapped), or aborting (configuration / persistence).

use thiserror::Error;

/// A specialized Result type for credential operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Errors produced by the credential subsystem.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No client identity configured at all. Fatal until an operator supplies
    /// `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET` or a credentials file.
    #[error(
        "no Spotify client credentials configured; set SPOTIFY_CLIENT_ID and \
         SPOTIFY_CLIENT_SECRET or create the credentials file"
    )]
    ConfigMissing,

    /// Identity is present but no tokens have been obtained yet.
    /// The interactive authorization flow (`spotify_mcp_server auth`) must run first.
    #[error("no tokens stored yet; run `spotify_mcp_server auth` to authorize")]
    NotBootstrapped,

    /// The refresh token was rejected as invalid or revoked. Terminal for the
    /// current session; never retried automatically.
    #[error("refresh token rejected by Spotify; run `spotify_mcp_server auth` to re-authorize")]
    AuthExpired,

    /// Transient transport failure talking to the token endpoint.
    /// Safe to retry with caller-chosen backoff.
    #[error("network error: {0}")]
    Network(String),

    /// The credentials file could not be read or written.
    #[error("credential storage error: {0}")]
    Persistence(String),

    /// The authorization-code exchange was rejected. Fatal for that bootstrap
    /// attempt only; no state is persisted.
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),

    /// The token endpoint replied with a body we could not interpret.
    #[error("invalid token endpoint response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// Create a new persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
