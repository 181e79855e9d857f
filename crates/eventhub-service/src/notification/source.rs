//! Ticket snapshot sources.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use eventhub_core::{AppError, AppResult};
use eventhub_entity::ticket::TicketWithEvent;

/// Supplies the ticket snapshots a user holds.
///
/// The data layer owning tickets lives outside EventHub; implementations
/// only read from it.
#[async_trait]
pub trait TicketSource: Send + Sync + std::fmt::Debug + 'static {
    /// All tickets held by `user_id`, each with its event embedded.
    async fn tickets_for_user(&self, user_id: &str) -> AppResult<Vec<TicketWithEvent>>;
}

/// Ticket source backed by a concurrent in-process map.
#[derive(Debug, Default)]
pub struct InMemoryTicketSource {
    tickets: DashMap<String, Vec<TicketWithEvent>>,
}

impl InMemoryTicketSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping user ids to ticket arrays.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let parsed: HashMap<String, Vec<TicketWithEvent>> = serde_json::from_str(json)?;
        let source = Self::new();
        for (user_id, tickets) in parsed {
            source.replace(user_id, tickets);
        }
        Ok(source)
    }

    /// Load a JSON seed file (see [`Self::from_json_str`]).
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                eventhub_core::error::ErrorKind::Configuration,
                format!("Failed to read ticket seed '{}'", path.display()),
                e,
            )
        })?;
        let source = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            users = source.user_count(),
            "Loaded ticket seed"
        );
        Ok(source)
    }

    /// Append a ticket to a user's holdings.
    pub fn insert(&self, user_id: impl Into<String>, ticket: TicketWithEvent) {
        self.tickets.entry(user_id.into()).or_default().push(ticket);
    }

    /// Replace a user's holdings.
    pub fn replace(&self, user_id: impl Into<String>, tickets: Vec<TicketWithEvent>) {
        self.tickets.insert(user_id.into(), tickets);
    }

    /// Number of users with at least one entry.
    pub fn user_count(&self) -> usize {
        self.tickets.len()
    }
}

#[async_trait]
impl TicketSource for InMemoryTicketSource {
    async fn tickets_for_user(&self, user_id: &str) -> AppResult<Vec<TicketWithEvent>> {
        Ok(self
            .tickets
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
