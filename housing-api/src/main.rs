//! housing-api - REST service for housing data preprocessing and prediction
//!
//! Settings resolve CLI > environment > TOML > defaults. Both stores are
//! SQLite files under the data folder.

use anyhow::{Context, Result};
use clap::Parser;
use housing_common::config::HousingConfig;
use housing_common::db::{documents, open_database};
use housing_api::{build_router, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

/// Command-line arguments for housing-api
#[derive(Parser, Debug)]
#[command(name = "housing-api")]
#[command(about = "Housing data preprocessing and prediction service")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "HOUSING_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Folder holding the document and prediction stores
    #[arg(long)]
    data_folder: Option<PathBuf>,

    /// Model artifact path
    #[arg(long)]
    model: Option<PathBuf>,

    /// tracing filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn apply(self, config: &mut HousingConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(folder) = self.data_folder {
            config.storage.data_folder = Some(folder);
        }
        if let Some(model) = self.model {
            config.model.path = model;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it carries the default log level
    let mut config = HousingConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    info!(
        "Starting Housing Data API (housing-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let documents_path = config.documents_db_path();
    let predictions_path = config.predictions_db_path();
    info!("Document store: {}", documents_path.display());
    info!("Prediction store: {}", predictions_path.display());
    info!("Model artifact: {}", config.model_path().display());

    let documents_pool = open_database(&documents_path)
        .await
        .context("Failed to open document store")?;
    documents::init_documents_table(&documents_pool)
        .await
        .context("Failed to initialize document store")?;
    let predictions_pool = open_database(&predictions_path)
        .await
        .context("Failed to open prediction store")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(documents_pool, predictions_pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("housing-api listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("housing-api stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
