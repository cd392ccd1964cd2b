//! Guild Settings
//!
//! Per-guild chat bot settings behind a two-tier store:
//! - An expiring cache (in-memory moka or Redis) serving fresh snapshots
//! - A durable store (in-memory or PostgreSQL) holding one record per guild
//! - A cache-aside repository keeping the two consistent
//! - A `prefix` command surface on top

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, AppConfigError};

use std::sync::Arc;

use tracing::info;

use domain::SettingsError;
use infrastructure::{
    cache::CacheFactory,
    settings::{CachedSettingsRepository, PrefixService},
    storage::StorageFactory,
};

/// Long-lived handles shared by every command
#[derive(Debug, Clone)]
pub struct AppState {
    pub repository: Arc<CachedSettingsRepository>,
    pub prefix_service: Arc<PrefixService<CachedSettingsRepository>>,
}

/// Create the application state with the default, fully in-memory configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
///
/// Builds both tiers, verifies they answer, and prepares the store's schema.
/// Missing backend settings fail with [`SettingsError::NotConfigured`];
/// malformed values fail with [`AppConfigError::Invalid`].
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache_config = config.cache_config().map_err(startup_error)?;
    let storage_config = config.storage_config().map_err(startup_error)?;
    let repository_config = config.repository_config().map_err(startup_error)?;

    let cache = CacheFactory::new().create(&cache_config).await?;
    info!(backend = cache.backend_name(), "Cache initialized");

    let store = StorageFactory::create(&storage_config).await?;
    info!(backend = store.backend_name(), "Store initialized");

    let repository = CachedSettingsRepository::builder()
        .cache(cache)
        .store(store)
        .config(repository_config)
        .build()?;

    repository.ping().await?;

    let repository = Arc::new(repository);
    let prefix_service = Arc::new(PrefixService::new(repository.clone()));

    Ok(AppState {
        repository,
        prefix_service,
    })
}

fn startup_error(error: AppConfigError) -> anyhow::Error {
    match error {
        AppConfigError::Missing(_) => SettingsError::not_configured(error.to_string()).into(),
        AppConfigError::Invalid(_) => error.into(),
    }
}
