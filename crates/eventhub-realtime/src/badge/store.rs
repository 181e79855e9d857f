//! Observable unread-count store.
//!
//! The badge value lives in the durable store under a well-known key so
//! that every context sharing the store converges on the same number.
//! Writes are announced two ways: listeners in the writing context are
//! called synchronously, and other contexts learn about the write from
//! [`KeyValueStore::watch`]. Each context skips store announcements that
//! it originated, so a listener sees one logical update exactly once.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use eventhub_core::config::BadgeConfig;
use eventhub_core::traits::store::{KeyValueStore, StoreChange};
use eventhub_core::types::id::{ContextId, ListenerId};

/// Callback invoked with the new badge value.
pub type BadgeCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// A badge update as seen by async subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeChange {
    /// The new (clamped) unread count.
    pub value: u64,
    /// The context that wrote it.
    pub origin: ContextId,
}

struct BadgeInner {
    store: Arc<dyn KeyValueStore>,
    key: String,
    context: ContextId,
    value: AtomicU64,
    degraded: AtomicBool,
    listeners: Mutex<Vec<(ListenerId, BadgeCallback)>>,
    changes: broadcast::Sender<BadgeChange>,
}

impl std::fmt::Debug for BadgeInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.lock().map(|l| l.len()).unwrap_or_default();
        f.debug_struct("BadgeInner")
            .field("key", &self.key)
            .field("context", &self.context)
            .field("value", &self.value)
            .field("degraded", &self.degraded)
            .field("listeners", &listeners)
            .finish_non_exhaustive()
    }
}

/// Unread badge bound to one execution context.
///
/// Dropping the store stops watching for other contexts' writes.
#[derive(Debug)]
pub struct BadgeStore {
    inner: Arc<BadgeInner>,
    watcher: JoinHandle<()>,
}

impl BadgeStore {
    /// Connect a new context to the badge persisted in `store`.
    ///
    /// The initial value is whatever was last persisted. Missing,
    /// unreadable, negative or non-numeric values read as 0.
    pub async fn connect(store: Arc<dyn KeyValueStore>, config: &BadgeConfig) -> Self {
        Self::connect_as(store, config, ContextId::new()).await
    }

    /// Connect with an explicit context id.
    pub async fn connect_as(
        store: Arc<dyn KeyValueStore>,
        config: &BadgeConfig,
        context: ContextId,
    ) -> Self {
        // Subscribe before reading so no write slips between the two.
        let watch = store.watch();

        let initial = match store.get(&config.storage_key).await {
            Ok(raw) => parse_count(raw.as_deref()),
            Err(e) => {
                warn!(key = %config.storage_key, error = %e, "Failed to read unread badge, starting at 0");
                0
            }
        };

        let (changes, _) = broadcast::channel(config.channel_capacity.max(1));
        let inner = Arc::new(BadgeInner {
            store,
            key: config.storage_key.clone(),
            context,
            value: AtomicU64::new(initial),
            degraded: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
            changes,
        });

        let watcher = tokio::spawn(watch_store(Arc::clone(&inner), watch));
        debug!(%context, initial, "Badge store connected");

        Self { inner, watcher }
    }

    /// The current unread count.
    pub fn get(&self) -> u64 {
        self.inner.value.load(Ordering::SeqCst)
    }

    /// Set the unread count, clamping negatives to 0.
    ///
    /// Persists the value and notifies listeners in this context
    /// immediately. A persistence failure switches the store to in-memory
    /// mode for the rest of the session; the update itself still applies.
    pub async fn set(&self, n: i64) {
        let value = u64::try_from(n.max(0)).unwrap_or_default();
        self.inner.value.store(value, Ordering::SeqCst);

        if !self.inner.degraded.load(Ordering::SeqCst) {
            let persisted = self
                .inner
                .store
                .set(&self.inner.key, &value.to_string(), self.inner.context)
                .await;
            if let Err(e) = persisted {
                if !self.inner.degraded.swap(true, Ordering::SeqCst) {
                    warn!(
                        key = %self.inner.key,
                        error = %e,
                        "Badge storage unavailable, keeping unread count in memory"
                    );
                }
            }
        }

        self.inner.deliver(BadgeChange {
            value,
            origin: self.inner.context,
        });
    }

    /// Register a callback fired on every badge change, local or remote.
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(callback)));
        id
    }

    /// Unregister a callback. Returns `true` if it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Receive badge changes asynchronously.
    pub fn subscribe(&self) -> broadcast::Receiver<BadgeChange> {
        self.inner.changes.subscribe()
    }

    /// Whether persistence has been abandoned for this session.
    pub fn is_degraded(&self) -> bool {
        self.inner.degraded.load(Ordering::SeqCst)
    }

    /// The context this store writes as.
    pub fn context_id(&self) -> ContextId {
        self.inner.context
    }

    /// The durable key holding the badge.
    pub fn key(&self) -> &str {
        &self.inner.key
    }
}

impl Drop for BadgeStore {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

impl BadgeInner {
    fn deliver(&self, change: BadgeChange) {
        let callbacks: Vec<BadgeCallback> = self
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(change.value);
        }
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }

    fn apply_remote(&self, change: StoreChange) {
        if change.key != self.key || change.origin == self.context {
            return;
        }
        let value = parse_count(change.value.as_deref());
        let previous = self.value.swap(value, Ordering::SeqCst);
        if previous == value {
            return;
        }
        debug!(origin = %change.origin, value, "Badge updated by another context");
        self.deliver(BadgeChange {
            value,
            origin: change.origin,
        });
    }
}

async fn watch_store(inner: Arc<BadgeInner>, mut watch: broadcast::Receiver<StoreChange>) {
    loop {
        match watch.recv().await {
            Ok(change) => inner.apply_remote(change),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Badge watcher lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}
