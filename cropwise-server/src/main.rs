//! cropwise-server - soil report OCR and crop planner service
//!
//! Startup order:
//! 1. Parse CLI, read the TOML config file (missing file → defaults)
//! 2. Initialize tracing, log build identification
//! 3. Resolve settings (CLI → env → TOML → defaults), create root folder
//! 4. Open/create the SQLite database
//! 5. Build the weather and vision clients, serve HTTP

use anyhow::{Context, Result};
use clap::Parser;
use cropwise_common::config::{CliOverrides, ConfigSource, ServiceConfig, TomlConfig};
use cropwise_server::services::{OpenWeatherClient, VisionClient};
use cropwise_server::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Soil report OCR and crop planner HTTP service
#[derive(Parser, Debug)]
#[command(name = "cropwise-server", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "CROPWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database and uploads
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// HTTP listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (toml, config_source) = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration file")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting cropwise-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_source {
        ConfigSource::File(path) => info!("Configuration file: {}", path.display()),
        ConfigSource::Missing(path) => warn!(
            "Config file not found at {}, using built-in defaults",
            path.display()
        ),
        ConfigSource::NoConfigDir => {
            warn!("Could not determine config directory, using built-in defaults")
        }
    }

    let cli = CliOverrides {
        root_folder: args.root_folder,
        port: args.port,
    };
    let config = ServiceConfig::resolve(&cli, toml)?;
    config
        .ensure_directories()
        .context("Failed to initialize root folder")?;

    let db_path = config.database_path();
    info!("Database: {}", db_path.display());
    let pool = cropwise_server::db::init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let weather = OpenWeatherClient::new(
        config.weather.base_url.clone(),
        config.weather.api_key.clone(),
        config.http_timeout,
    )?;
    let vision = VisionClient::new(
        config.vision.base_url.clone(),
        config.vision.api_key.clone(),
        config.http_timeout,
    )?;
    info!(
        weather_url = %config.weather.base_url,
        vision_url = %config.vision.base_url,
        timeout_secs = config.http_timeout.as_secs(),
        "External API clients ready"
    );

    let state = AppState::new(pool, Arc::new(weather), Arc::new(vision), config.uploads_dir());
    let app = build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("cropwise-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("cropwise-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
