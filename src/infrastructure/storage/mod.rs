//! Storage infrastructure - Durable settings stores

mod factory;
mod in_memory;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemorySettingsStore;
pub use postgres::{PostgresConfig, PostgresSettingsStore, DEFAULT_TABLE};
