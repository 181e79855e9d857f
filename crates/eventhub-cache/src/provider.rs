//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use eventhub_core::config::cache::CacheConfig;
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_core::traits::store::{KeyValueStore, StoreChange};
use eventhub_core::types::id::ContextId;

/// Store manager that wraps the configured durable store.
///
/// The provider is selected at construction time based on configuration.
/// Cloning the manager shares the underlying store.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis store");
                let store =
                    crate::redis::RedisStore::connect(&config.redis, config.watch_capacity)
                        .await?;
                Arc::new(store)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory store");
                Arc::new(crate::memory::MemoryStore::new(
                    &config.memory,
                    config.watch_capacity,
                ))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// Get the inner store as a shareable handle.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, origin: ContextId) -> AppResult<()> {
        self.inner.set(key, value, origin).await
    }

    async fn delete(&self, key: &str, origin: ContextId) -> AppResult<()> {
        self.inner.delete(key, origin).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.watch()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
