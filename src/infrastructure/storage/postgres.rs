//! PostgreSQL settings store with connection pooling

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::domain::settings::{
    GuildId, GuildSettings, GuildSettingsStore, Prefix, SettingsFilter, SettingsId,
    SettingsUpdate,
};
use crate::domain::DomainError;

/// Default table holding one row per guild
pub const DEFAULT_TABLE: &str = "guild_settings";

/// PostgreSQL store configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Table holding the settings rows
    pub table_name: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/guild_settings".to_string(),
            table_name: DEFAULT_TABLE.to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// Settings store backed by a single PostgreSQL table
///
/// `guild_id` carries a UNIQUE constraint, so concurrent first-time inserts
/// for the same guild resolve to one row and a [`DomainError::Conflict`].
pub struct PostgresSettingsStore {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresSettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSettingsStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresSettingsStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;

        Ok(Self { pool, table_name })
    }

    /// Opens a connection pool
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        validate_table_name(&config.table_name)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Self::new(pool, config.table_name.clone())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the table and its unique guild index when missing
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                guild_id TEXT NOT NULL,
                prefix TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&create_table)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        let create_index = format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {table}_guild_id_key ON {table} (guild_id)",
            table = self.table_name
        );

        sqlx::query(&create_index)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create guild index: {}", e)))?;

        Ok(())
    }
}

fn validate_table_name(name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid table name '{}': use letters, digits and underscores",
            name
        )))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}

fn settings_from_row(row: &PgRow) -> Result<GuildSettings, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode row: {}", e));

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let guild_id: String = row.try_get("guild_id").map_err(decode)?;
    let prefix: String = row.try_get("prefix").map_err(decode)?;

    let guild_id: GuildId = guild_id
        .parse()
        .map_err(|e| DomainError::storage(format!("Stored guild id is invalid: {}", e)))?;
    let prefix = Prefix::new(prefix)
        .map_err(|e| DomainError::storage(format!("Stored prefix is invalid: {}", e)))?;

    Ok(GuildSettings::new(guild_id, prefix).with_id(SettingsId::from_uuid(id)))
}

#[async_trait]
impl GuildSettingsStore for PostgresSettingsStore {
    async fn find_one(
        &self,
        filter: &SettingsFilter,
    ) -> Result<Option<GuildSettings>, DomainError> {
        let query = format!(
            "SELECT id, guild_id, prefix FROM {} WHERE guild_id = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(filter.guild_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find settings: {}", e)))?;

        row.as_ref().map(settings_from_row).transpose()
    }

    async fn insert_one(&self, settings: GuildSettings) -> Result<SettingsId, DomainError> {
        let query = format!(
            "INSERT INTO {} (guild_id, prefix) VALUES ($1, $2) RETURNING id",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(settings.guild_id().to_string())
            .bind(settings.prefix().as_str())
            .fetch_one(&self.pool)
            .await;

        let row = match result {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                return Err(DomainError::conflict(format!(
                    "duplicate key: settings for guild '{}' already exist",
                    settings.guild_id()
                )));
            }
            Err(err) => {
                return Err(DomainError::storage(format!(
                    "Failed to insert settings: {}",
                    err
                )));
            }
        };

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to decode row: {}", e)))?;

        Ok(SettingsId::from_uuid(id))
    }

    async fn find_one_and_update(
        &self,
        filter: &SettingsFilter,
        update: &SettingsUpdate,
    ) -> Result<Option<GuildSettings>, DomainError> {
        let Some(prefix) = &update.prefix else {
            return self.find_one(filter).await;
        };

        let query = format!(
            r#"
            UPDATE {}
            SET prefix = $2, updated_at = NOW()
            WHERE guild_id = $1
            RETURNING id, guild_id, prefix
            "#,
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(filter.guild_id.to_string())
            .bind(prefix.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update settings: {}", e)))?;

        row.as_ref().map(settings_from_row).transpose()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to ping PostgreSQL: {}", e)))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
