//! Convention router demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum + tower-http layers
//!                        │  /user, /user/{*path_params}
//!                        ▼
//!                  routing adapter ──▶ Context::init
//!                        │
//!                        ▼
//!          scope handlers (root → leaf) ──▶ controller handlers
//!                        │
//!                        ▼
//!             Context::before ──▶ controller method
//!                        │
//!                        ▼
//!     Client Response ◀── Context rendered as HTTP response
//! ```

mod controllers;

use std::path::PathBuf;

use clap::Parser;

use convention_router::config::{load_config, validate_config, ConfigError, ServerConfig};
use convention_router::lifecycle;
use convention_router::observability::logging;

#[derive(Parser)]
#[command(name = "convention-router")]
#[command(about = "Convention-driven controller dispatch demo server", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Token required by `/admin` controllers. The `/admin` scope is not mounted without it.
    #[arg(long, env = "ADMIN_TOKEN")]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability)?;
    tracing::info!("convention-router v{} starting", env!("CARGO_PKG_VERSION"));

    let route = controllers::build_routes(&config.routing.prefix, cli.admin_token)?;
    lifecycle::serve(config, &route).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
