//! Cache-aside settings repository

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::cache::{Cache, CacheKeyGenerator, DEFAULT_NAMESPACE};
use crate::domain::settings::{
    CacheStatus, GuildId, GuildSettings, GuildSettingsStore, Outcome, Prefix, SettingsError,
    SettingsFilter, SettingsRepository, SettingsUpdate,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_lookup, record_cache_refresh_failure, record_prefix_change,
    record_settings_created, CacheLookupResult,
};

/// Tuning for [`CachedSettingsRepository`]
#[derive(Debug, Clone)]
pub struct SettingsRepositoryConfig {
    /// Cache key namespace
    pub namespace: String,
    /// Lifetime of a cached snapshot
    pub ttl: Duration,
    /// Bound on each cache call
    pub cache_timeout: Duration,
    /// Bound on each store call
    pub store_timeout: Duration,
    /// Prefix given to a guild the first time it is seen
    pub default_prefix: Prefix,
}

impl Default for SettingsRepositoryConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            ttl: Duration::from_secs(60),
            cache_timeout: Duration::from_millis(2000),
            store_timeout: Duration::from_millis(5000),
            default_prefix: Prefix::default(),
        }
    }
}

impl SettingsRepositoryConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_default_prefix(mut self, prefix: Prefix) -> Self {
        self.default_prefix = prefix;
        self
    }
}

/// Result of reading a guild's snapshot from the cache tier
#[derive(Debug)]
enum CacheLookup {
    Hit(GuildSettings),
    Miss,
    Corrupt(String),
    Unavailable(DomainError),
}

/// Settings repository keeping an expiring cache in front of the durable store
///
/// Reads are served from the cache while a snapshot is fresh and fall back to
/// the store otherwise, creating the record with the default prefix on first
/// sight. Writes go to the store first and then overwrite the cache. Cache
/// failures never fail an operation; store failures always do.
pub struct CachedSettingsRepository {
    cache: Arc<dyn Cache>,
    store: Arc<dyn GuildSettingsStore>,
    keys: CacheKeyGenerator,
    config: SettingsRepositoryConfig,
}

impl fmt::Debug for CachedSettingsRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedSettingsRepository")
            .field("cache", &self.cache)
            .field("store", &self.store.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

impl CachedSettingsRepository {
    pub fn new(
        cache: Arc<dyn Cache>,
        store: Arc<dyn GuildSettingsStore>,
        config: SettingsRepositoryConfig,
    ) -> Self {
        Self {
            cache,
            store,
            keys: CacheKeyGenerator::new(config.namespace.clone()),
            config,
        }
    }

    pub fn builder() -> CachedSettingsRepositoryBuilder {
        CachedSettingsRepositoryBuilder::default()
    }

    pub fn config(&self) -> &SettingsRepositoryConfig {
        &self.config
    }

    /// Verifies both tiers are reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.cache.ping().await?;
        debug!(backend = self.cache.backend_name(), "Cache reachable");

        self.store.ping().await?;
        debug!(backend = self.store.backend_name(), "Store reachable");

        Ok(())
    }

    async fn read_cache(&self, guild_id: GuildId) -> CacheLookup {
        let key = self.keys.generate(&guild_id);

        let raw = match tokio::time::timeout(self.config.cache_timeout, self.cache.get_raw(&key))
            .await
        {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => return CacheLookup::Miss,
            Ok(Err(e)) => return CacheLookup::Unavailable(e),
            Err(_) => {
                return CacheLookup::Unavailable(DomainError::cache(format!(
                    "Cache read timed out after {}ms",
                    self.config.cache_timeout.as_millis()
                )));
            }
        };

        match serde_json::from_str::<GuildSettings>(&raw) {
            Ok(settings) if settings.guild_id() == guild_id => CacheLookup::Hit(settings),
            Ok(settings) => CacheLookup::Corrupt(format!(
                "entry holds settings of guild {}",
                settings.guild_id()
            )),
            Err(e) => CacheLookup::Corrupt(e.to_string()),
        }
    }

    async fn refresh_cache(&self, settings: &GuildSettings) -> CacheStatus {
        let guild_id = settings.guild_id();

        match self.write_cache(settings).await {
            Ok(()) => {
                debug!(guild_id = %guild_id, "Cache refreshed");
                CacheStatus::Refreshed
            }
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to refresh cached settings");
                record_cache_refresh_failure();
                CacheStatus::RefreshFailed(e)
            }
        }
    }

    async fn write_cache(&self, settings: &GuildSettings) -> Result<(), DomainError> {
        let key = self.keys.generate(&settings.guild_id());
        let data = serde_json::to_string(settings).map_err(|e| {
            DomainError::cache(format!("Failed to serialize settings: {}", e))
        })?;

        tokio::time::timeout(
            self.config.cache_timeout,
            self.cache.set_raw(&key, &data, self.config.ttl),
        )
        .await
        .map_err(|_| {
            DomainError::cache(format!(
                "Cache write timed out after {}ms",
                self.config.cache_timeout.as_millis()
            ))
        })?
    }

    async fn with_store_timeout<T, F>(&self, operation: &str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        tokio::time::timeout(self.config.store_timeout, call)
            .await
            .map_err(|_| {
                DomainError::storage(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.config.store_timeout.as_millis()
                ))
            })?
    }

    async fn load_from_store(&self, guild_id: GuildId) -> Result<GuildSettings, SettingsError> {
        let filter = SettingsFilter::by_guild(guild_id);

        let found = self
            .with_store_timeout("find_one", self.store.find_one(&filter))
            .await
            .map_err(SettingsError::Retrieval)?;

        match found {
            Some(settings) => Ok(settings),
            None => self.create_default(guild_id).await,
        }
    }

    async fn create_default(&self, guild_id: GuildId) -> Result<GuildSettings, SettingsError> {
        let settings = GuildSettings::new(guild_id, self.config.default_prefix.clone());

        let inserted = self
            .with_store_timeout("insert_one", self.store.insert_one(settings.clone()))
            .await;

        match inserted {
            Ok(id) => {
                info!(
                    guild_id = %guild_id,
                    prefix = %settings.prefix(),
                    "Created default settings"
                );
                record_settings_created();
                Ok(settings.with_id(id))
            }
            Err(e) if e.is_conflict() => {
                info!(guild_id = %guild_id, "Settings created concurrently, re-reading");

                self.with_store_timeout(
                    "find_one",
                    self.store.find_one(&SettingsFilter::by_guild(guild_id)),
                )
                .await
                .map_err(SettingsError::Retrieval)?
                .ok_or_else(|| {
                    SettingsError::Retrieval(DomainError::not_found(format!(
                        "Settings for guild {} missing after duplicate insert",
                        guild_id
                    )))
                })
            }
            Err(e) => Err(SettingsError::Retrieval(e)),
        }
    }
}

#[async_trait]
impl SettingsRepository for CachedSettingsRepository {
    async fn get_settings(
        &self,
        guild_id: GuildId,
    ) -> Result<Outcome<GuildSettings>, SettingsError> {
        match self.read_cache(guild_id).await {
            CacheLookup::Hit(settings) => {
                debug!(guild_id = %guild_id, "Settings cache hit");
                record_cache_lookup(CacheLookupResult::Hit);
                return Ok(Outcome::new(settings, CacheStatus::Hit));
            }
            CacheLookup::Miss => {
                debug!(guild_id = %guild_id, "Settings cache miss");
                record_cache_lookup(CacheLookupResult::Miss);
            }
            CacheLookup::Corrupt(reason) => {
                warn!(guild_id = %guild_id, reason = %reason, "Discarding corrupt cache entry");
                record_cache_lookup(CacheLookupResult::Corrupt);
            }
            CacheLookup::Unavailable(e) => {
                warn!(guild_id = %guild_id, error = %e, "Cache unavailable, reading store");
                record_cache_lookup(CacheLookupResult::Error);
            }
        }

        let settings = self.load_from_store(guild_id).await?;
        let status = self.refresh_cache(&settings).await;

        Ok(Outcome::new(settings, status))
    }

    async fn update_prefix(
        &self,
        guild_id: GuildId,
        new_prefix: Prefix,
    ) -> Result<Outcome<GuildSettings>, SettingsError> {
        let current = self.get_settings(guild_id).await?.into_value();

        if *current.prefix() == new_prefix {
            return Err(SettingsError::PrefixUnchanged { prefix: new_prefix });
        }

        let filter = SettingsFilter::by_guild(guild_id);
        let update = SettingsUpdate::new().set_prefix(new_prefix);

        let updated = self
            .with_store_timeout(
                "find_one_and_update",
                self.store.find_one_and_update(&filter, &update),
            )
            .await
            .map_err(SettingsError::Update)?
            .ok_or(SettingsError::RecordVanished { guild_id })?;

        info!(
            guild_id = %guild_id,
            from = %current.prefix(),
            to = %updated.prefix(),
            "Prefix changed"
        );
        record_prefix_change();

        let status = self.refresh_cache(&updated).await;
        Ok(Outcome::new(updated, status))
    }
}

/// Builder that refuses to produce a repository without both tiers
#[derive(Default)]
pub struct CachedSettingsRepositoryBuilder {
    cache: Option<Arc<dyn Cache>>,
    store: Option<Arc<dyn GuildSettingsStore>>,
    config: SettingsRepositoryConfig,
}

impl CachedSettingsRepositoryBuilder {
    pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn store(mut self, store: Arc<dyn GuildSettingsStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: SettingsRepositoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<CachedSettingsRepository, SettingsError> {
        let cache = self
            .cache
            .ok_or_else(|| SettingsError::not_configured("cache handle is missing"))?;
        let store = self
            .store
            .ok_or_else(|| SettingsError::not_configured("store handle is missing"))?;

        Ok(CachedSettingsRepository::new(cache, store, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Barrier;

    use crate::domain::cache::MockCache;
    use crate::domain::settings::{MockGuildSettingsStore, SettingsId};
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::storage::InMemorySettingsStore;

    fn guild(id: u64) -> GuildId {
        GuildId::new(id)
    }

    fn prefix(value: &str) -> Prefix {
        Prefix::new(value).unwrap()
    }

    fn key(id: u64) -> String {
        format!("guild_settings:{}", id)
    }

    struct Fixture {
        cache: Arc<InMemoryCache>,
        store: Arc<InMemorySettingsStore>,
        repository: CachedSettingsRepository,
    }

    fn fixture() -> Fixture {
        let cache = Arc::new(InMemoryCache::new());
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            cache.clone(),
            store.clone(),
            SettingsRepositoryConfig::default(),
        );

        Fixture {
            cache,
            store,
            repository,
        }
    }

    async fn stored_prefix(store: &InMemorySettingsStore, id: u64) -> Option<String> {
        store
            .find_one(&SettingsFilter::by_guild(guild(id)))
            .await
            .unwrap()
            .map(|s| s.prefix().to_string())
    }

    async fn cached(cache: &dyn Cache, id: u64) -> Option<GuildSettings> {
        cache
            .get_raw(&key(id))
            .await
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_unseen_guild_gets_default_prefix() {
        let f = fixture();

        let outcome = f.repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), ">>");
        assert!(outcome.value().id().is_some());
        assert!(matches!(outcome.cache_status(), CacheStatus::Refreshed));
        assert_eq!(stored_prefix(&f.store, 1).await.as_deref(), Some(">>"));
        assert_eq!(f.store.count().unwrap(), 1);

        let cached = cached(f.cache.as_ref(), 1).await.unwrap();
        assert_eq!(cached.prefix(), ">>");
        let ttl = f.cache.ttl(&key(1)).await.unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_degrades_to_refresh_failure() {
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            Arc::new(InMemoryCache::new()),
            store.clone(),
            SettingsRepositoryConfig::default().with_ttl(Duration::MAX),
        );

        let outcome = repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), ">>");
        assert!(matches!(outcome.cache_status(), CacheStatus::RefreshFailed(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_second_read_is_cache_hit() {
        let f = fixture();

        f.repository.get_settings(guild(1)).await.unwrap();
        let outcome = f.repository.get_settings(guild(1)).await.unwrap();

        assert!(outcome.cache_status().is_hit());
        assert_eq!(f.store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_custom_default_prefix() {
        let cache = Arc::new(InMemoryCache::new());
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            cache,
            store.clone(),
            SettingsRepositoryConfig::default().with_default_prefix(prefix("!")),
        );

        let outcome = repository.get_settings(guild(3)).await.unwrap();

        assert_eq!(outcome.value().prefix(), "!");
        assert_eq!(stored_prefix(&store, 3).await.as_deref(), Some("!"));
    }

    #[tokio::test]
    async fn test_update_writes_through_to_both_tiers() {
        let f = fixture();

        let outcome = f
            .repository
            .update_prefix(guild(1), prefix("!!"))
            .await
            .unwrap();

        assert_eq!(outcome.value().prefix(), "!!");
        assert!(matches!(outcome.cache_status(), CacheStatus::Refreshed));
        assert_eq!(stored_prefix(&f.store, 1).await.as_deref(), Some("!!"));
        assert_eq!(cached(f.cache.as_ref(), 1).await.unwrap().prefix(), "!!");
    }

    #[tokio::test]
    async fn test_fresh_cache_takes_precedence_over_store() {
        let f = fixture();
        f.repository
            .update_prefix(guild(1), prefix("!!"))
            .await
            .unwrap();

        // Mutate the store behind the repository's back
        let update = SettingsUpdate::new().set_prefix(prefix("??"));
        f.store
            .find_one_and_update(&SettingsFilter::by_guild(guild(1)), &update)
            .await
            .unwrap();

        let outcome = f.repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), "!!");
        assert!(outcome.cache_status().is_hit());
    }

    #[tokio::test]
    async fn test_evicted_entry_falls_back_to_store_and_repopulates() {
        let f = fixture();
        f.repository
            .update_prefix(guild(1), prefix("!!"))
            .await
            .unwrap();

        let update = SettingsUpdate::new().set_prefix(prefix("??"));
        f.store
            .find_one_and_update(&SettingsFilter::by_guild(guild(1)), &update)
            .await
            .unwrap();
        f.cache.delete(&key(1)).await.unwrap();

        let outcome = f.repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), "??");
        assert!(matches!(outcome.cache_status(), CacheStatus::Refreshed));
        assert_eq!(cached(f.cache.as_ref(), 1).await.unwrap().prefix(), "??");
    }

    #[tokio::test]
    async fn test_expired_entry_falls_back_to_store() {
        let cache = Arc::new(InMemoryCache::new());
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            cache,
            store.clone(),
            SettingsRepositoryConfig::default().with_ttl(Duration::from_millis(30)),
        );

        repository.get_settings(guild(1)).await.unwrap();
        let update = SettingsUpdate::new().set_prefix(prefix("??"));
        store
            .find_one_and_update(&SettingsFilter::by_guild(guild(1)), &update)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        let outcome = repository.get_settings(guild(1)).await.unwrap();
        assert_eq!(outcome.value().prefix(), "??");
        assert!(!outcome.cache_status().is_hit());
    }

    #[tokio::test]
    async fn test_unchanged_prefix_performs_no_writes() {
        let settings =
            GuildSettings::new(guild(1), prefix("!!")).with_id(SettingsId::new());
        let cache = Arc::new(MockCache::new().with_entry(&key(1), &settings, None));

        let mut store = MockGuildSettingsStore::new();
        store.expect_find_one().never();
        store.expect_insert_one().never();
        store.expect_find_one_and_update().never();

        let repository = CachedSettingsRepository::new(
            cache.clone(),
            Arc::new(store),
            SettingsRepositoryConfig::default(),
        );

        let result = repository.update_prefix(guild(1), prefix("!!")).await;

        match result {
            Err(SettingsError::PrefixUnchanged { prefix }) => assert_eq!(prefix, "!!"),
            other => panic!("expected PrefixUnchanged, got {:?}", other),
        }
        assert_eq!(cache.write_count(), 0);
    }

    /// Holds the first two lookups until both have observed the store
    struct RacingStore {
        inner: InMemorySettingsStore,
        barrier: Barrier,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl GuildSettingsStore for RacingStore {
        async fn find_one(
            &self,
            filter: &SettingsFilter,
        ) -> Result<Option<GuildSettings>, DomainError> {
            let call = self.lookups.fetch_add(1, Ordering::SeqCst);
            let result = self.inner.find_one(filter).await;

            if call < 2 {
                self.barrier.wait().await;
            }

            result
        }

        async fn insert_one(&self, settings: GuildSettings) -> Result<SettingsId, DomainError> {
            self.inner.insert_one(settings).await
        }

        async fn find_one_and_update(
            &self,
            filter: &SettingsFilter,
            update: &SettingsUpdate,
        ) -> Result<Option<GuildSettings>, DomainError> {
            self.inner.find_one_and_update(filter, update).await
        }

        async fn ping(&self) -> Result<(), DomainError> {
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "racing"
        }
    }

    #[tokio::test]
    async fn test_concurrent_first_reads_create_one_record() {
        let store = Arc::new(RacingStore {
            inner: InMemorySettingsStore::new(),
            barrier: Barrier::new(2),
            lookups: AtomicUsize::new(0),
        });
        let repository = CachedSettingsRepository::new(
            Arc::new(InMemoryCache::new()),
            store.clone(),
            SettingsRepositoryConfig::default(),
        );

        let (first, second) = tokio::join!(
            repository.get_settings(guild(1)),
            repository.get_settings(guild(1))
        );

        let first = first.unwrap().into_value();
        let second = second.unwrap().into_value();

        assert_eq!(first.prefix(), ">>");
        assert_eq!(second.prefix(), ">>");
        assert_eq!(first.id(), second.id());
        assert_eq!(store.inner.count().unwrap(), 1);
        // Both saw "not found", the loser re-read once
        assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cache_read_failure_falls_back_to_store() {
        let cache = Arc::new(MockCache::new().with_error());
        let store = Arc::new(InMemorySettingsStore::with_records(vec![GuildSettings::new(
            guild(1),
            prefix("!!"),
        )]));
        let repository = CachedSettingsRepository::new(
            cache,
            store,
            SettingsRepositoryConfig::default(),
        );

        let outcome = repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), "!!");
        assert!(outcome.cache_status().is_degraded());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_treated_as_miss_and_replaced() {
        let cache = Arc::new(MockCache::new().with_raw_entry(&key(1), "{not json"));
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            cache.clone(),
            store.clone(),
            SettingsRepositoryConfig::default(),
        );

        let outcome = repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), ">>");
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(cache.write_count(), 1);
        let repaired: GuildSettings = serde_json::from_str(&cache.raw(&key(1)).unwrap()).unwrap();
        assert_eq!(repaired.guild_id(), guild(1));
    }

    #[tokio::test]
    async fn test_entry_for_other_guild_is_treated_as_corrupt() {
        let foreign = GuildSettings::new(guild(2), prefix("$"));
        let cache = Arc::new(MockCache::new().with_entry(&key(1), &foreign, None));
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            cache,
            store,
            SettingsRepositoryConfig::default(),
        );

        let outcome = repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().guild_id(), guild(1));
        assert_eq!(outcome.value().prefix(), ">>");
    }

    #[tokio::test]
    async fn test_store_failure_propagates_without_fabricating() {
        let cache = Arc::new(MockCache::new());
        let mut store = MockGuildSettingsStore::new();
        store
            .expect_find_one()
            .times(1)
            .returning(|_| Err(DomainError::storage("connection refused")));
        store.expect_insert_one().never();

        let repository = CachedSettingsRepository::new(
            cache.clone(),
            Arc::new(store),
            SettingsRepositoryConfig::default(),
        );

        let result = repository.get_settings(guild(1)).await;

        assert!(matches!(result, Err(SettingsError::Retrieval(_))));
        assert_eq!(cache.write_count(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_propagates() {
        let mut store = MockGuildSettingsStore::new();
        store.expect_find_one().returning(|_| Ok(None));
        store
            .expect_insert_one()
            .times(1)
            .returning(|_| Err(DomainError::storage("disk full")));

        let repository = CachedSettingsRepository::new(
            Arc::new(MockCache::new()),
            Arc::new(store),
            SettingsRepositoryConfig::default(),
        );

        let result = repository.get_settings(guild(1)).await;
        assert!(matches!(result, Err(SettingsError::Retrieval(DomainError::Storage { .. }))));
    }

    #[tokio::test]
    async fn test_conflict_without_record_is_retrieval_error() {
        let mut store = MockGuildSettingsStore::new();
        store.expect_find_one().times(2).returning(|_| Ok(None));
        store
            .expect_insert_one()
            .times(1)
            .returning(|_| Err(DomainError::conflict("duplicate key")));

        let repository = CachedSettingsRepository::new(
            Arc::new(MockCache::new()),
            Arc::new(store),
            SettingsRepositoryConfig::default(),
        );

        let result = repository.get_settings(guild(1)).await;
        assert!(matches!(result, Err(SettingsError::Retrieval(DomainError::NotFound { .. }))));
    }

    #[tokio::test]
    async fn test_update_of_vanished_record() {
        let cache = Arc::new(MockCache::new());
        let mut store = MockGuildSettingsStore::new();
        store
            .expect_find_one()
            .returning(|_| Ok(Some(GuildSettings::new(GuildId::new(1), Prefix::default()))));
        store
            .expect_find_one_and_update()
            .times(1)
            .returning(|_, _| Ok(None));
        store.expect_insert_one().never();

        let repository = CachedSettingsRepository::new(
            cache.clone(),
            Arc::new(store),
            SettingsRepositoryConfig::default(),
        );

        let result = repository.update_prefix(guild(1), prefix("!!")).await;

        assert!(matches!(
            result,
            Err(SettingsError::RecordVanished { guild_id }) if guild_id == guild(1)
        ));
        // Only the read-through populated the cache
        assert_eq!(cache.write_count(), 1);
        assert_eq!(cached(cache.as_ref(), 1).await.unwrap().prefix(), ">>");
    }

    #[tokio::test]
    async fn test_update_failure_is_update_error() {
        let mut store = MockGuildSettingsStore::new();
        store
            .expect_find_one()
            .returning(|_| Ok(Some(GuildSettings::new(GuildId::new(1), Prefix::default()))));
        store
            .expect_find_one_and_update()
            .returning(|_, _| Err(DomainError::storage("connection reset")));

        let repository = CachedSettingsRepository::new(
            Arc::new(MockCache::new()),
            Arc::new(store),
            SettingsRepositoryConfig::default(),
        );

        let result = repository.update_prefix(guild(1), prefix("!!")).await;
        assert!(matches!(result, Err(SettingsError::Update(_))));
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_reported_not_raised() {
        let cache = Arc::new(MockCache::new());
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            cache.clone(),
            store.clone(),
            SettingsRepositoryConfig::default(),
        );

        repository.get_settings(guild(1)).await.unwrap();
        cache.set_failing(true);

        let outcome = repository
            .update_prefix(guild(1), prefix("!!"))
            .await
            .unwrap();

        assert_eq!(outcome.value().prefix(), "!!");
        assert!(outcome.cache_status().is_degraded());
        assert_eq!(stored_prefix(&store, 1).await.as_deref(), Some("!!"));
    }

    #[derive(Debug)]
    struct SlowCache;

    #[async_trait]
    impl Cache for SlowCache {
        async fn get_raw(&self, _key: &str) -> Result<Option<String>, DomainError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(None)
        }

        async fn set_raw(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<(), DomainError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn ttl(&self, _key: &str) -> Result<Option<Duration>, DomainError> {
            Ok(None)
        }

        fn backend_name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_slow_cache_times_out_and_falls_through() {
        let store = Arc::new(InMemorySettingsStore::new());
        let repository = CachedSettingsRepository::new(
            Arc::new(SlowCache),
            store.clone(),
            SettingsRepositoryConfig::default().with_cache_timeout(Duration::from_millis(20)),
        );

        let outcome = repository.get_settings(guild(1)).await.unwrap();

        assert_eq!(outcome.value().prefix(), ">>");
        assert!(outcome.cache_status().is_degraded());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        struct SlowStore;

        #[async_trait]
        impl GuildSettingsStore for SlowStore {
            async fn find_one(
                &self,
                _filter: &SettingsFilter,
            ) -> Result<Option<GuildSettings>, DomainError> {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok(None)
            }

            async fn insert_one(
                &self,
                _settings: GuildSettings,
            ) -> Result<SettingsId, DomainError> {
                Ok(SettingsId::new())
            }

            async fn find_one_and_update(
                &self,
                _filter: &SettingsFilter,
                _update: &SettingsUpdate,
            ) -> Result<Option<GuildSettings>, DomainError> {
                Ok(None)
            }

            async fn ping(&self) -> Result<(), DomainError> {
                Ok(())
            }

            fn backend_name(&self) -> &'static str {
                "slow"
            }
        }

        let repository = CachedSettingsRepository::new(
            Arc::new(MockCache::new()),
            Arc::new(SlowStore),
            SettingsRepositoryConfig::default().with_store_timeout(Duration::from_millis(20)),
        );

        let result = repository.get_settings(guild(1)).await;

        match result {
            Err(SettingsError::Retrieval(DomainError::Storage { message })) => {
                assert!(message.contains("timed out"));
            }
            other => panic!("expected a store timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ping_checks_both_tiers() {
        let f = fixture();
        assert!(f.repository.ping().await.is_ok());

        let repository = CachedSettingsRepository::new(
            Arc::new(MockCache::new().with_error()),
            Arc::new(InMemorySettingsStore::new()),
            SettingsRepositoryConfig::default(),
        );
        assert!(matches!(
            repository.ping().await,
            Err(DomainError::Cache { .. })
        ));
    }

    #[test]
    fn test_builder_requires_both_handles() {
        let missing_store = CachedSettingsRepository::builder()
            .cache(Arc::new(InMemoryCache::new()))
            .build();
        assert!(matches!(missing_store, Err(SettingsError::NotConfigured(_))));

        let missing_cache = CachedSettingsRepository::builder()
            .store(Arc::new(InMemorySettingsStore::new()))
            .build();
        assert!(matches!(missing_cache, Err(SettingsError::NotConfigured(_))));

        let repository = CachedSettingsRepository::builder()
            .cache(Arc::new(InMemoryCache::new()))
            .store(Arc::new(InMemorySettingsStore::new()))
            .config(SettingsRepositoryConfig::default().with_namespace("bot"))
            .build()
            .unwrap();
        assert_eq!(repository.config().namespace, "bot");
    }
}
