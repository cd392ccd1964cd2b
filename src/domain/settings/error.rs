//! Settings repository errors

use thiserror::Error;

use super::entity::{GuildId, Prefix};
use super::validation::SettingsValidationError;
use crate::domain::DomainError;

/// Failures surfaced by the settings repository and prefix service
///
/// Cache-tier problems never appear here; they are absorbed and reported
/// through [`CacheStatus`](super::CacheStatus) instead.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings backend not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid prefix: {0}")]
    InvalidPrefix(#[from] SettingsValidationError),

    #[error("Error retrieving guild settings: {0}")]
    Retrieval(#[source] DomainError),

    #[error("Prefix is already set to {prefix}")]
    PrefixUnchanged { prefix: Prefix },

    #[error("Settings for guild {guild_id} disappeared before the update was applied")]
    RecordVanished { guild_id: GuildId },

    #[error("Error updating guild settings: {0}")]
    Update(#[source] DomainError),
}

impl SettingsError {
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured(message.into())
    }

    /// True when the requested prefix was already current
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::PrefixUnchanged { .. })
    }
}
