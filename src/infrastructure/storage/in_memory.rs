//! In-memory settings store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::settings::{
    GuildId, GuildSettings, GuildSettingsStore, SettingsFilter, SettingsId, SettingsUpdate,
};
use crate::domain::DomainError;

/// Thread-safe in-memory settings store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Keyed by guild, so the uniqueness constraint holds by construction.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    records: RwLock<HashMap<GuildId, GuildSettings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records, assigning ids where missing
    pub fn with_records(records: Vec<GuildSettings>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write().unwrap_or_else(|e| e.into_inner());

            for record in records {
                let record = match record.id() {
                    Some(_) => record,
                    None => record.with_id(SettingsId::new()),
                };
                map.insert(record.guild_id(), record);
            }
        }
        store
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.len())
    }
}

#[async_trait]
impl GuildSettingsStore for InMemorySettingsStore {
    async fn find_one(
        &self,
        filter: &SettingsFilter,
    ) -> Result<Option<GuildSettings>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.get(&filter.guild_id).cloned())
    }

    async fn insert_one(&self, settings: GuildSettings) -> Result<SettingsId, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let guild_id = settings.guild_id();

        if records.contains_key(&guild_id) {
            return Err(DomainError::conflict(format!(
                "duplicate key: settings for guild '{}' already exist",
                guild_id
            )));
        }

        let id = SettingsId::new();
        records.insert(guild_id, settings.with_id(id));
        Ok(id)
    }

    async fn find_one_and_update(
        &self,
        filter: &SettingsFilter,
        update: &SettingsUpdate,
    ) -> Result<Option<GuildSettings>, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(records.get_mut(&filter.guild_id).map(|record| {
            update.apply(record);
            record.clone()
        }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
