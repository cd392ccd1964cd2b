//! Cache key generation

use std::fmt::Display;

/// Namespace used for guild settings entries
pub const DEFAULT_NAMESPACE: &str = "guild_settings";

/// Builds `<namespace>:<id>` cache keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyGenerator {
    namespace: String,
}

impl CacheKeyGenerator {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Generates the key for a single entity
    pub fn generate(&self, id: &impl Display) -> String {
        format!("{}:{}", self.namespace, id)
    }
}

impl Default for CacheKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
