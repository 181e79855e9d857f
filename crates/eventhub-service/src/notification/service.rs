//! Notification feed service.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use eventhub_core::AppResult;
use eventhub_entity::notification::{NotificationFeed, ReadMarkerSet, UnreadCount};

use crate::context::RequestContext;

use super::source::TicketSource;
use super::synthesizer::NotificationSynthesizer;

/// Builds notification feeds for authenticated users.
///
/// Read state is session-local on the client, so every server-side feed
/// is computed against an empty read-marker set.
#[derive(Debug, Clone)]
pub struct NotificationFeedService {
    /// Where ticket snapshots come from.
    source: Arc<dyn TicketSource>,
    /// Derivation rules.
    synthesizer: NotificationSynthesizer,
}

impl NotificationFeedService {
    /// Creates a new feed service.
    pub fn new(source: Arc<dyn TicketSource>, synthesizer: NotificationSynthesizer) -> Self {
        Self {
            source,
            synthesizer,
        }
    }

    /// Derives the current feed for the caller.
    pub async fn feed(&self, ctx: &RequestContext) -> AppResult<NotificationFeed> {
        let tickets = self.source.tickets_for_user(&ctx.user_id).await?;
        let records = self
            .synthesizer
            .synthesize(&tickets, &ReadMarkerSet::new(), Utc::now());
        debug!(
            user_id = %ctx.user_id,
            tickets = tickets.len(),
            notifications = records.len(),
            "Derived notification feed"
        );
        Ok(NotificationFeed::new(records))
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<UnreadCount> {
        let feed = self.feed(ctx).await?;
        Ok(UnreadCount {
            unread_count: feed.unread_count.unwrap_or_default(),
        })
    }
}
