//! Durable key-value store trait shared by every execution context.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::result::AppResult;
use crate::types::id::ContextId;

/// A change announced by a [`KeyValueStore`] to every watcher.
///
/// `origin` identifies the context that performed the write, so a
/// context can recognise and skip echoes of its own mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    /// The key that changed (unprefixed).
    pub key: String,
    /// The new value, or `None` when the key was removed.
    pub value: Option<String>,
    /// The context that performed the write.
    pub origin: ContextId,
}

/// Trait for durable stores (in-memory or Redis) shared between contexts.
///
/// All values are strings. Implementations are responsible for key
/// prefixing and for announcing every successful write on the watch
/// channel.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value and announce the change on behalf of `origin`.
    async fn set(&self, key: &str, value: &str, origin: ContextId) -> AppResult<()>;

    /// Delete a key and announce the removal on behalf of `origin`.
    async fn delete(&self, key: &str, origin: ContextId) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Subscribe to changes made by any context sharing this store.
    fn watch(&self) -> broadcast::Receiver<StoreChange>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
