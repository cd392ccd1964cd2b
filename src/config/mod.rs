//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AppConfigError, CacheSection, LogFormat, LoggingConfig, PostgresSection,
    SettingsSection, StorageSection, TTL_SECS_RANGE,
};
