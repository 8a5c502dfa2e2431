//! castdir-api - actor directory service entry point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use castdir_common::config::{
    prepare_database_path, resolve_root_folder, ServiceConfig, ROOT_FOLDER_ENV,
};
use castdir_common::db::init_database;
use castdir_api::services::TvMazeClient;
use castdir_api::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for castdir-api
#[derive(Parser, Debug)]
#[command(name = "castdir-api")]
#[command(about = "Actor directory service backed by TVmaze")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "CASTDIR_PORT")]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1", env = "CASTDIR_BIND")]
    bind: std::net::IpAddr,

    /// Folder holding castdir.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path of the TOML configuration file
    #[arg(short, long, env = "CASTDIR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "castdir_api=info,castdir_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting castdir-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = ServiceConfig::load(args.config.as_deref());

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    let db_path = prepare_database_path(&root_folder)
        .with_context(|| format!("Failed to prepare root folder {}", root_folder.display()))?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let directory = TvMazeClient::new(
        &config.tvmaze_base_url,
        Duration::from_secs(config.upstream_timeout_secs),
    )
    .context("Failed to build TVmaze client")?;
    info!("Upstream directory: {}", config.tvmaze_base_url);

    let addr = SocketAddr::new(args.bind, args.port);
    let public_base_url = config
        .public_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}", addr));

    let state = AppState::new(pool, Arc::new(directory), public_base_url);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("castdir-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
