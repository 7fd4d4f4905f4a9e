//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use super::auth::{ClientIdentity, DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_URL};

/// Default location of the persisted credential record, relative to the
/// working directory unless overridden.
pub const DEFAULT_CREDENTIALS_PATH: &str = "spotify-credentials.json";

/// Spotify Web API base.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Credential storage and client identity configuration.
    pub credentials: CredentialsConfig,

    /// Spotify endpoint configuration.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for credential storage and the OAuth client identity.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Path of the persisted credential record.
    pub store_path: PathBuf,

    /// OAuth client id, used to seed a fresh record.
    pub client_id: Option<String>,

    /// OAuth client secret paired with the id.
    pub client_secret: Option<String>,

    /// Redirect URI registered for the application.
    pub redirect_uri: Option<String>,
}

impl CredentialsConfig {
    /// The configured identity, when all fields are present.
    pub fn identity(&self) -> Option<ClientIdentity> {
        Some(ClientIdentity {
            client_id: self.client_id.clone()?,
            client_secret: self.client_secret.clone()?,
            redirect_uri: self.redirect_uri.clone()?,
        })
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("store_path", &self.store_path)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Configuration for the Spotify endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Web API base URL.
    pub base_url: String,

    /// Accounts service token endpoint.
    pub token_url: String,

    /// Accounts service user-consent endpoint.
    pub authorize_url: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            client_id: None,
            client_secret: None,
            redirect_uri: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "spotify-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            credentials: CredentialsConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`); Spotify settings use the `SPOTIFY_` prefix
    /// (`SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `SPOTIFY_REDIRECT_URI`,
    /// `SPOTIFY_CREDENTIALS_PATH`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(path) = std::env::var("SPOTIFY_CREDENTIALS_PATH") {
            config.credentials.store_path = PathBuf::from(path);
        }

        if let Ok(client_id) = std::env::var("SPOTIFY_CLIENT_ID") {
            config.credentials.client_id = Some(client_id);
        }

        if let Ok(client_secret) = std::env::var("SPOTIFY_CLIENT_SECRET") {
            config.credentials.client_secret = Some(client_secret);
        }

        if let Ok(redirect_uri) = std::env::var("SPOTIFY_REDIRECT_URI") {
            config.credentials.redirect_uri = Some(redirect_uri);
        }

        if config.credentials.identity().is_some() {
            info!("Spotify client identity loaded from environment");
        } else {
            warn!(
                "No complete Spotify client identity in the environment; \
                 the credentials file at {:?} must already hold one",
                config.credentials.store_path
            );
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_identity_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("SPOTIFY_CLIENT_ID", "test_id");
            std::env::set_var("SPOTIFY_CLIENT_SECRET", "test_secret");
            std::env::set_var("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:8888/callback");
        }
        let config = Config::from_env();
        let identity = config.credentials.identity().unwrap();
        assert_eq!(identity.client_id, "test_id");
        assert_eq!(identity.client_secret, "test_secret");
        unsafe {
            std::env::remove_var("SPOTIFY_CLIENT_ID");
            std::env::remove_var("SPOTIFY_CLIENT_SECRET");
            std::env::remove_var("SPOTIFY_REDIRECT_URI");
        }
    }

    #[test]
    fn test_identity_requires_all_fields() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("SPOTIFY_CLIENT_ID");
            std::env::remove_var("SPOTIFY_CLIENT_SECRET");
            std::env::remove_var("SPOTIFY_REDIRECT_URI");
            std::env::set_var("SPOTIFY_CLIENT_ID", "only_id");
        }
        let config = Config::from_env();
        assert!(config.credentials.identity().is_none());
        unsafe {
            std::env::remove_var("SPOTIFY_CLIENT_ID");
        }
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let creds = CredentialsConfig {
            store_path: PathBuf::from("creds.json"),
            client_id: Some("id".to_string()),
            client_secret: Some("super_secret_key".to_string()),
            redirect_uri: None,
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_default_endpoints() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.spotify.com/v1");
        assert_eq!(config.api.token_url, "https://accounts.spotify.com/api/token");
    }
}
