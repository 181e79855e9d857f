//! Redis store implementation.
//!
//! Writes go to plain string keys; every write is also announced as a JSON
//! [`StoreChange`] on a pub/sub channel, which a background task relays to
//! local watchers.

use async_trait::async_trait;
use futures::StreamExt;
use redis::AsyncCommands;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use eventhub_core::config::cache::RedisCacheConfig;
use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_core::traits::store::{KeyValueStore, StoreChange};
use eventhub_core::types::id::ContextId;

use super::client::RedisClient;

/// Redis-backed store.
#[derive(Debug, Clone)]
pub struct RedisStore {
    /// Redis client.
    client: RedisClient,
    /// Pub/sub channel carrying change announcements.
    change_channel: String,
    /// Local fan-out of relayed announcements.
    changes: broadcast::Sender<StoreChange>,
}

impl RedisStore {
    /// Create a new Redis store and start relaying change announcements.
    pub async fn connect(config: &RedisCacheConfig, watch_capacity: usize) -> AppResult<Self> {
        let client = RedisClient::connect(config).await?;
        let (changes, _) = broadcast::channel(watch_capacity.max(1));
        let store = Self {
            client,
            change_channel: config.change_channel.clone(),
            changes,
        };
        store.spawn_relay().await?;
        Ok(store)
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }

    async fn spawn_relay(&self) -> AppResult<()> {
        let mut pubsub = self
            .client
            .client()
            .get_async_pubsub()
            .await
            .map_err(Self::map_err)?;
        pubsub
            .subscribe(&self.change_channel)
            .await
            .map_err(Self::map_err)?;

        let tx = self.changes.clone();
        let channel = self.change_channel.clone();
        tokio::spawn(async move {
            let mut messages = pubsub.into_on_message();
            while let Some(msg) = messages.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(channel = %channel, "Unreadable change payload: {e}");
                        continue;
                    }
                };
                match serde_json::from_str::<StoreChange>(&payload) {
                    Ok(change) => {
                        let _ = tx.send(change);
                    }
                    Err(e) => warn!(channel = %channel, "Malformed change payload: {e}"),
                }
            }
            debug!(channel = %channel, "Redis change relay stopped");
        });
        Ok(())
    }

    async fn announce(&self, key: &str, value: Option<&str>, origin: ContextId) -> AppResult<()> {
        let change = StoreChange {
            key: key.to_string(),
            value: value.map(str::to_string),
            origin,
        };
        let payload = serde_json::to_string(&change)?;
        let mut conn = self.client.conn_mut();
        let _: i64 = conn
            .publish(&self.change_channel, payload)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, origin: ContextId) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.set(&full_key, value).await.map_err(Self::map_err)?;
        self.announce(key, Some(value), origin).await
    }

    async fn delete(&self, key: &str, origin: ContextId) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        self.announce(key, None, origin).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    fn watch(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
