//! Contacts API - Main entry point

use anyhow::Result;
use contacts_api::repositories::{ContactRepository, InMemoryContactRepository};
use contacts_api::services::{ContactService, ContactServiceImpl};
use contacts_api::{AppState, Config, Metrics};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL from .env applies
    let config = Config::from_env();

    let level = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        upload_dir = %config.upload_dir.display(),
        favorite_limit = config.favorite_limit,
        max_sync_batch = config.max_sync_batch,
        "Starting Contacts API"
    );

    let metrics = Metrics::new();
    let repo = Arc::new(InMemoryContactRepository::new()) as Arc<dyn ContactRepository>;
    let service = Arc::new(ContactServiceImpl::new(
        repo,
        config.favorite_limit,
        config.max_sync_batch,
        metrics.clone(),
    )) as Arc<dyn ContactService>;

    let state = AppState::new(config, service, metrics);
    contacts_api::run_server(state).await?;

    info!("Contacts API shutdown complete");
    Ok(())
}
