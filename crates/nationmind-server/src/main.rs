//! Server binary for the Nation-Mind game backend.
//!
//! Wires configuration, logging, the database pool and the HTTP API
//! together, then serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `nationmind-config.yaml` (or the path given
//!    as the first argument), then apply environment overrides
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Serve the REST API

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use nationmind_api::{AppState, ServerConfig};
use nationmind_core::{GameConfig, LogFormat};
use nationmind_db::{PostgresConfig, PostgresPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

const DEFAULT_CONFIG_PATH: &str = "nationmind-config.yaml";

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = GameConfig::from_file(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config)?;
    info!(
        config = %config_path.display(),
        host = config.server.host,
        port = config.server.port,
        max_connections = config.database.max_connections,
        "nationmind-server starting"
    );

    // 3. Connect and migrate.
    let pool = PostgresPool::connect(&PostgresConfig::from_settings(&config.database)).await?;
    pool.run_migrations().await?;
    info!("Database ready");

    // 4. Serve.
    let state = Arc::new(AppState::new(pool.clone()));
    let result = nationmind_api::start_server(&ServerConfig::from(&config.server), state).await;

    pool.close().await;
    result?;

    info!("nationmind-server shutdown complete");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_tracing(config: &GameConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_env_err| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| StartupError::Logging {
        message: e.to_string(),
    })
}
