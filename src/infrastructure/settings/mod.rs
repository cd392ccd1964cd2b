//! Guild settings infrastructure implementations

mod repository;
mod service;

pub use repository::{
    CachedSettingsRepository, CachedSettingsRepositoryBuilder, SettingsRepositoryConfig,
};
pub use service::PrefixService;
