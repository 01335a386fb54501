//! fedsearch: federated search over independent result providers
//!
//! This is the main entry point for the HTTP server.

use anyhow::Result;
use clap::Parser;
use fedsearch::{
    config,
    providers::ProviderLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting fedsearch v{}", fedsearch::VERSION);

    // Load configuration
    let settings = config::load(cli.config)?;
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Load providers
    let registry = ProviderLoader::load(&settings)?;
    if registry.is_empty() {
        warn!("No providers configured, every search will fail");
    }

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    let state = AppState::new(settings, registry);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Federated search over independent result providers
#[derive(Debug, Parser)]
#[command(name = "fedsearch", version, about)]
#[command(after_help = "Environment:
  FEDSEARCH_DEBUG          Enable debug mode (true/false)
  FEDSEARCH_PORT           Server port
  FEDSEARCH_BIND_ADDRESS   Bind address
  FEDSEARCH_BLOCK_SIZE     Results per provider on one page
  FEDSEARCH_TOKEN_LIMIT    Maximum number of query tokens
  RUST_LOG                 Log filter (default: info)")]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, value_name = "FILE", env = config::SETTINGS_PATH_VAR)]
    config: Option<PathBuf>,
}
