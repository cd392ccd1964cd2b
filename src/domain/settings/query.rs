//! Typed filter and update descriptors for the settings store

use super::entity::{GuildId, GuildSettings, Prefix};

/// Selects the settings record of a single guild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsFilter {
    pub guild_id: GuildId,
}

impl SettingsFilter {
    pub fn by_guild(guild_id: GuildId) -> Self {
        Self { guild_id }
    }

    pub fn matches(&self, settings: &GuildSettings) -> bool {
        settings.guild_id() == self.guild_id
    }
}

/// Fields to overwrite on a settings record; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub prefix: Option<Prefix>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_none()
    }

    /// Applies the update in place
    pub fn apply(&self, settings: &mut GuildSettings) {
        if let Some(prefix) = &self.prefix {
            settings.set_prefix(prefix.clone());
        }
    }
}
