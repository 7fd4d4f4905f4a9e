//! MCP Server Entry Point
//!
//! This is the main entry point for the MCP server. It initializes logging,
//! loads configuration, and either serves MCP over stdio (the default) or
//! runs the one-time interactive authorization flow (`auth` subcommand).

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use spotify_mcp_server::core::auth::{AuthBootstrapper, CredentialStore, HttpTokenEndpoint};
use spotify_mcp_server::core::{Config, McpServer, StdioTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    match std::env::args().nth(1).as_deref() {
        Some("auth") => run_auth_flow(&config).await,
        Some(other) => {
            eprintln!("Unknown subcommand: {other}. Usage: spotify_mcp_server [auth]");
            std::process::exit(2);
        }
        None => run_server(config).await,
    }
}

async fn run_server(config: Config) -> Result<()> {
    info!("Starting {} v{}", config.server.name, config.server.version);

    // Create the MCP server
    let server = McpServer::new(config);

    info!("Server initialized");

    StdioTransport::run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// One-time interactive authorization: print the consent URL, read the pasted
/// authorization code, exchange it, and seed the credential store.
async fn run_auth_flow(config: &Config) -> Result<()> {
    let store = match config.credentials.identity() {
        Some(identity) => {
            CredentialStore::with_identity(config.credentials.store_path.clone(), identity)
        }
        None => CredentialStore::new(config.credentials.store_path.clone()),
    };
    let endpoint = Arc::new(HttpTokenEndpoint::new(config.api.token_url.clone()));
    let bootstrapper = AuthBootstrapper::new(store.clone(), endpoint)
        .with_authorize_url(config.api.authorize_url.clone());

    println!("Open this URL in a browser and approve access:");
    println!("\n  {}\n", bootstrapper.authorize_url()?);
    println!("After approving you will be redirected; copy the 'code' query parameter.");
    print!("Authorization code: ");
    std::io::stdout().flush()?;

    let mut code = String::new();
    std::io::stdin().read_line(&mut code)?;
    let code = code.trim();
    if code.is_empty() {
        anyhow::bail!("no authorization code provided");
    }

    bootstrapper.exchange(code).await?;
    println!("Authorization complete. Credentials saved to {:?}.", store.path());

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
