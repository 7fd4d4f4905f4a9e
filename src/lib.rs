//! Spotify MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes the
//! Spotify Web API as a catalog of tools, with transparent OAuth2 credential
//! management underneath.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling,
//!   the credential lifecycle (`core::auth`), the main server, and the stdio
//!   transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **spotify**: Thin typed client for the Spotify Web API
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use spotify_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, CredentialManager, Error, McpServer, Result};
