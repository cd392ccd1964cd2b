//! Result wrapper that reports what happened to the cache tier

use crate::domain::DomainError;

/// State of the cache tier after a successful settings operation
#[derive(Debug)]
pub enum CacheStatus {
    /// Value was served from a fresh cache entry; the store was not touched
    Hit,
    /// Cache entry was (re)written with the returned value
    Refreshed,
    /// Operation succeeded but the cache could not be written
    RefreshFailed(DomainError),
}

impl CacheStatus {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }
}

/// A successful value together with the cache tier's status
#[derive(Debug)]
pub struct Outcome<T> {
    value: T,
    cache: CacheStatus,
}

impl<T> Outcome<T> {
    pub fn new(value: T, cache: CacheStatus) -> Self {
        Self { value, cache }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn cache_status(&self) -> &CacheStatus {
        &self.cache
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, CacheStatus) {
        (self.value, self.cache)
    }
}
