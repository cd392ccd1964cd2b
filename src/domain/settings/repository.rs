//! Settings repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{GuildId, GuildSettings, Prefix};
use super::error::SettingsError;
use super::outcome::Outcome;

/// Read/update access to guild settings, hiding how they are cached
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Returns the guild's settings, creating them with the default prefix on
    /// first sight
    async fn get_settings(&self, guild_id: GuildId)
        -> Result<Outcome<GuildSettings>, SettingsError>;

    /// Changes the guild's prefix; fails with
    /// [`SettingsError::PrefixUnchanged`] when it is already current
    async fn update_prefix(
        &self,
        guild_id: GuildId,
        new_prefix: Prefix,
    ) -> Result<Outcome<GuildSettings>, SettingsError>;
}
