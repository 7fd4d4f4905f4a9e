//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool router.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! The ToolRouter is built dynamically in `domains/tools/router.rs`, so
//! adding a new tool does not require modifying this file. Every tool shares
//! one `SpotifyClient`, which in turn obtains a valid bearer token from the
//! credential manager before each API request.

#[allow(unused_imports)]
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;

use super::auth::{CredentialManager, CredentialStore, HttpTokenEndpoint};
use super::config::Config;
use crate::domains::spotify::SpotifyClient;
use crate::domains::tools::build_tool_router;

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// tool calls to the Spotify tool definitions.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let store = match config.credentials.identity() {
            Some(identity) => {
                CredentialStore::with_identity(config.credentials.store_path.clone(), identity)
            }
            None => CredentialStore::new(config.credentials.store_path.clone()),
        };
        let endpoint = Arc::new(HttpTokenEndpoint::new(config.api.token_url.clone()));
        let credentials = Arc::new(CredentialManager::new(store, endpoint));
        let client = Arc::new(SpotifyClient::new(config.api.base_url.clone(), credentials));

        Self {
            tool_router: build_tool_router::<Self>(client),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Spotify MCP server. Provides tools for searching the catalog, controlling \
                 playback, managing the queue, and working with playlists. Requires a completed \
                 authorization (`spotify_mcp_server auth`) before tools can be used."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolRegistry;

    #[test]
    fn test_server_reports_configured_name() {
        let server = McpServer::new(Config::default());
        assert_eq!(server.name(), "spotify-mcp-server");
        assert!(!server.version().is_empty());
    }

    #[test]
    fn test_server_router_covers_registry() {
        let server = McpServer::new(Config::default());
        let router_names: Vec<_> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        for name in ToolRegistry::tool_names() {
            assert!(router_names.iter().any(|n| n == name));
        }
    }
}
