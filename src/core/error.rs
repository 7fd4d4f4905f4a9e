//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies, providing consistent error handling
//! across the entire application.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the credential lifecycle subsystem.
    #[error("Credential error: {0}")]
    Auth(#[from] crate::core::auth::AuthError),

    /// Error from the Spotify Web API client.
    #[error("Spotify API error: {0}")]
    Api(#[from] crate::domains::spotify::SpotifyError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::AuthError;
    use crate::domains::spotify::SpotifyError;

    #[test]
    fn test_auth_error_converts() {
        let err: Error = AuthError::NotBootstrapped.into();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("Credential error"));
    }

    #[test]
    fn test_api_error_converts() {
        let err: Error = SpotifyError::api(404, "No active device found").into();
        assert!(matches!(err, Error::Api(_)));
        assert!(err.to_string().contains("No active device found"));
    }
}
