use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::cache::DEFAULT_NAMESPACE;
use crate::domain::settings::Prefix;
use crate::infrastructure::cache::{CacheConfig, CacheType};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::settings::SettingsRepositoryConfig;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType, DEFAULT_TABLE};

/// Accepted range for `settings.ttl_secs`
pub const TTL_SECS_RANGE: std::ops::RangeInclusive<u64> = 1..=3600;

/// Failures turning [`AppConfig`] into factory and repository inputs
#[derive(Debug, Error)]
pub enum AppConfigError {
    /// A selected backend lacks its connection setting
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSection,
    pub storage: StorageSection,
    pub settings: SettingsSection,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Expiring cache tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub max_capacity: u64,
}

/// Durable store tier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    #[serde(rename = "type")]
    pub storage_type: String,
    pub postgres: PostgresSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSection {
    pub url: Option<String>,
    pub table: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Cache-aside protocol tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsSection {
    pub namespace: String,
    pub ttl_secs: u64,
    pub cache_timeout_ms: u64,
    pub store_timeout_ms: u64,
    pub default_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            cache_type: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
        }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            storage_type: "in_memory".to_string(),
            postgres: PostgresSection::default(),
        }
    }
}

impl Default for PostgresSection {
    fn default() -> Self {
        Self {
            url: None,
            table: DEFAULT_TABLE.to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl_secs: 60,
            cache_timeout_ms: 2000,
            store_timeout_ms: 5000,
            default_prefix: Prefix::DEFAULT.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, `config/local`, then `APP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(config::Environment::with_prefix("APP"))
    }

    pub(crate) fn load_with_env(env: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(env.separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// Cache factory input; a Redis cache without a URL is rejected
    pub fn cache_config(&self) -> Result<CacheConfig, AppConfigError> {
        let cache_type = CacheType::from_str(&self.cache.cache_type)
            .map_err(|e| AppConfigError::invalid(e.to_string()))?;
        let ttl = self.settings.ttl()?;

        let mut config = match cache_type {
            CacheType::InMemory => CacheConfig::in_memory(),
            CacheType::Redis => {
                let url = non_blank(self.cache.redis_url.as_deref())
                    .ok_or(AppConfigError::Missing("cache.redis_url"))?;
                CacheConfig::redis(url)
            }
        };

        config = config
            .with_max_capacity(self.cache.max_capacity)
            .with_max_ttl(ttl);

        if let Some(prefix) = non_blank(self.cache.key_prefix.as_deref()) {
            config = config.with_key_prefix(prefix);
        }

        Ok(config)
    }

    /// Storage factory input; a Postgres store without a URL is rejected
    pub fn storage_config(&self) -> Result<StorageConfig, AppConfigError> {
        let storage_type = StorageType::from_str(&self.storage.storage_type).ok_or_else(|| {
            AppConfigError::invalid(format!(
                "Unknown storage type: {}. Valid types: in_memory, postgres",
                self.storage.storage_type
            ))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(StorageConfig::in_memory()),
            StorageType::Postgres => {
                let pg = &self.storage.postgres;
                let url = non_blank(pg.url.as_deref())
                    .ok_or(AppConfigError::Missing("storage.postgres.url"))?;

                Ok(StorageConfig::postgres(
                    PostgresConfig::new(url)
                        .with_table_name(pg.table.clone())
                        .with_max_connections(pg.max_connections)
                        .with_min_connections(pg.min_connections)
                        .with_connect_timeout(pg.connect_timeout_secs)
                        .with_idle_timeout(pg.idle_timeout_secs),
                ))
            }
        }
    }

    /// Repository tuning; the default prefix must itself be a valid prefix
    pub fn repository_config(&self) -> Result<SettingsRepositoryConfig, AppConfigError> {
        let settings = &self.settings;
        let default_prefix = Prefix::new(settings.default_prefix.clone()).map_err(|e| {
            AppConfigError::invalid(format!("settings.default_prefix is invalid: {}", e))
        })?;

        if settings.namespace.trim().is_empty() {
            return Err(AppConfigError::invalid("settings.namespace cannot be empty"));
        }

        Ok(SettingsRepositoryConfig::default()
            .with_namespace(settings.namespace.clone())
            .with_ttl(settings.ttl()?)
            .with_cache_timeout(Duration::from_millis(settings.cache_timeout_ms))
            .with_store_timeout(Duration::from_millis(settings.store_timeout_ms))
            .with_default_prefix(default_prefix))
    }
}

impl SettingsSection {
    fn ttl(&self) -> Result<Duration, AppConfigError> {
        if !TTL_SECS_RANGE.contains(&self.ttl_secs) {
            return Err(AppConfigError::invalid(format!(
                "settings.ttl_secs must be between {} and {}, got {}",
                TTL_SECS_RANGE.start(),
                TTL_SECS_RANGE.end(),
                self.ttl_secs
            )));
        }

        Ok(Duration::from_secs(self.ttl_secs))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
