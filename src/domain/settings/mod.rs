//! Guild settings domain

mod entity;
mod error;
mod outcome;
mod query;
mod repository;
mod store;
mod validation;

pub use entity::{GuildId, GuildSettings, Prefix, SettingsId};
pub use error::SettingsError;
pub use outcome::{CacheStatus, Outcome};
pub use query::{SettingsFilter, SettingsUpdate};
pub use repository::SettingsRepository;
pub use store::GuildSettingsStore;
pub use validation::{
    parse_guild_id, validate_prefix, SettingsValidationError, MAX_PREFIX_LENGTH,
};

#[cfg(test)]
pub use repository::MockSettingsRepository;
#[cfg(test)]
pub use store::MockGuildSettingsStore;
