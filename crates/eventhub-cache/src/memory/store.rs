//! In-memory store implementation using the moka crate.

use async_trait::async_trait;
use moka::future::Cache;
use tokio::sync::broadcast;
use tracing::debug;

use eventhub_core::config::cache::MemoryCacheConfig;
use eventhub_core::result::AppResult;
use eventhub_core::traits::store::{KeyValueStore, StoreChange};
use eventhub_core::types::id::ContextId;

/// In-memory store using moka.
///
/// Every context holding a clone of the same `MemoryStore` observes the
/// others' writes through [`KeyValueStore::watch`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// The underlying moka cache.
    cache: Cache<String, String>,
    /// Change announcements.
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig, watch_capacity: usize) -> Self {
        let cache = Cache::builder().max_capacity(config.max_capacity).build();
        let (changes, _) = broadcast::channel(watch_capacity.max(1));
        Self { cache, changes }
    }

    fn announce(&self, key: &str, value: Option<String>, origin: ContextId) {
        // No watchers is fine.
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            value,
            origin,
        });
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: &str, origin: ContextId) -> AppResult<()> {
        self.cache.insert(key.to_string(), value.to_string()).await;
        debug!(key, %origin, "Memory store write");
        self.announce(key, Some(value.to_string()), origin);
        Ok(())
    }

    async fn delete(&self, key: &str, origin: ContextId) -> AppResult<()> {
        self.cache.remove(key).await;
        self.announce(key, None, origin);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
