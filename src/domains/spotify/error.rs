//! Spotify Web API error types.

use thiserror::Error;

use crate::core::auth::AuthError;

/// Errors that can occur while talking to the Spotify Web API.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// The credential subsystem could not produce a usable token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The API rejected the request.
    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure talking to the API.
    #[error("network error: {0}")]
    Network(String),

    /// A reply we could not interpret.
    #[error("unexpected API response: {0}")]
    InvalidResponse(String),
}

impl SpotifyError {
    /// Create a new API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}
