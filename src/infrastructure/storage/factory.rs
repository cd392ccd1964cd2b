//! Storage factory for runtime store selection

use std::sync::Arc;

use crate::domain::settings::GuildSettingsStore;
use crate::domain::DomainError;

use super::in_memory::InMemorySettingsStore;
use super::postgres::{PostgresConfig, PostgresSettingsStore};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating settings stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a store based on the configuration, preparing its schema
    pub async fn create(
        config: &StorageConfig,
    ) -> Result<Arc<dyn GuildSettingsStore>, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemorySettingsStore::new())),
            StorageConfig::Postgres(pg_config) => {
                if pg_config.url.trim().is_empty() {
                    return Err(DomainError::configuration(
                        "PostgreSQL URL is required for postgres storage type",
                    ));
                }

                let store = PostgresSettingsStore::connect(pg_config).await?;
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }
}
