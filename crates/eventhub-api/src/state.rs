//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use eventhub_cache::StoreManager;
use eventhub_core::AppResult;
use eventhub_core::config::AppConfig;
use eventhub_service::notification::{
    InMemoryTicketSource, NotificationFeedService, NotificationSynthesizer, NotificationWindows,
    TicketSource,
};
use eventhub_service::session::{SessionResolver, StaticSessionResolver};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Durable store (Redis or in-memory)
    pub store: Arc<StoreManager>,
    /// Bearer token resolver
    pub sessions: Arc<dyn SessionResolver>,
    /// Notification feed service
    pub feed_service: Arc<NotificationFeedService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wire the default state from configuration: the configured store,
    /// static token grants, and the ticket seed file if one is set.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let store = Arc::new(StoreManager::new(&config.cache).await?);
        let sessions = Arc::new(StaticSessionResolver::from_config(&config.auth)?);

        let tickets: Arc<dyn TicketSource> = match config.data.seed_file.as_deref() {
            Some(path) => Arc::new(InMemoryTicketSource::from_json_file(path).await?),
            None => Arc::new(InMemoryTicketSource::new()),
        };

        Ok(Self::new(config, store, sessions, tickets))
    }

    /// Assemble state from already-built parts.
    pub fn new(
        config: AppConfig,
        store: Arc<StoreManager>,
        sessions: Arc<dyn SessionResolver>,
        tickets: Arc<dyn TicketSource>,
    ) -> Self {
        let synthesizer =
            NotificationSynthesizer::new(NotificationWindows::from(&config.notifications));
        let feed_service = Arc::new(NotificationFeedService::new(tickets, synthesizer));
        Self {
            config: Arc::new(config),
            store,
            sessions,
            feed_service,
            started_at: Instant::now(),
        }
    }
}
