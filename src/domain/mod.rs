//! Domain layer - Core entities, traits and errors

pub mod cache;
pub mod error;
pub mod settings;

pub use cache::{Cache, CacheKeyGenerator};
pub use error::DomainError;
pub use settings::{
    CacheStatus, GuildId, GuildSettings, GuildSettingsStore, Outcome, Prefix, SettingsError,
    SettingsFilter, SettingsId, SettingsRepository, SettingsUpdate,
};
