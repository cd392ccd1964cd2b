//! Durable settings store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{GuildSettings, SettingsId};
use super::query::{SettingsFilter, SettingsUpdate};
use crate::domain::DomainError;

/// Authoritative store holding one settings record per guild
///
/// Implementations must enforce uniqueness on `guild_id`: a second insert for
/// the same guild fails with [`DomainError::Conflict`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GuildSettingsStore: Send + Sync {
    /// Point lookup by guild
    async fn find_one(&self, filter: &SettingsFilter)
        -> Result<Option<GuildSettings>, DomainError>;

    /// Inserts a new record and returns the identity the store assigned
    async fn insert_one(&self, settings: GuildSettings) -> Result<SettingsId, DomainError>;

    /// Atomically applies `update` to the matching record and returns the
    /// record as it is after the update, or `None` when nothing matched
    async fn find_one_and_update(
        &self,
        filter: &SettingsFilter,
        update: &SettingsUpdate,
    ) -> Result<Option<GuildSettings>, DomainError>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> Result<(), DomainError>;

    fn backend_name(&self) -> &'static str;
}
