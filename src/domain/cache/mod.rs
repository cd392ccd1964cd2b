//! Cache domain - expiring cache abstraction

mod key;
mod repository;

pub use key::{CacheKeyGenerator, DEFAULT_NAMESPACE};
pub use repository::Cache;

#[cfg(test)]
pub use repository::mock::MockCache;
