//! Prefix service for reading and changing a guild's command prefix

use std::sync::Arc;

use tracing::debug;

use crate::domain::settings::{
    GuildId, GuildSettings, Outcome, Prefix, SettingsError, SettingsRepository,
};

/// Prefix service built on a settings repository
#[derive(Debug)]
pub struct PrefixService<R: SettingsRepository> {
    repository: Arc<R>,
}

impl<R: SettingsRepository> PrefixService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Full settings record of a guild, created on first sight
    pub async fn settings(
        &self,
        guild_id: GuildId,
    ) -> Result<Outcome<GuildSettings>, SettingsError> {
        self.repository.get_settings(guild_id).await
    }

    /// Current prefix of a guild
    pub async fn get_prefix(&self, guild_id: GuildId) -> Result<Prefix, SettingsError> {
        let settings = self.repository.get_settings(guild_id).await?.into_value();
        debug!(guild_id = %guild_id, prefix = %settings.prefix(), "Resolved prefix");

        Ok(settings.prefix().clone())
    }

    /// Validates and applies a new prefix, returning the one now in effect
    pub async fn change_prefix(
        &self,
        guild_id: GuildId,
        new_prefix: &str,
    ) -> Result<Prefix, SettingsError> {
        let new_prefix = Prefix::new(new_prefix)?;
        let settings = self
            .repository
            .update_prefix(guild_id, new_prefix)
            .await?
            .into_value();

        Ok(settings.prefix().clone())
    }
}
