//! Ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::lenient;

/// A ticket snapshot with its event embedded.
///
/// Supplied read-only by the data layer; nothing in EventHub mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketWithEvent {
    /// Ticket identifier.
    #[serde(default, alias = "_id", deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,
    /// Event identifier as stored on the ticket row.
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub event_id: Option<String>,
    /// Ticket creation time (raw).
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<String>,
    /// The embedded event.
    #[serde(default)]
    pub event: Option<Event>,
}

impl TicketWithEvent {
    /// The event id, preferring the embedded event over the ticket column.
    pub fn resolved_event_id(&self) -> Option<&str> {
        self.event
            .as_ref()
            .and_then(|e| e.id.as_deref())
            .or(self.event_id.as_deref())
    }

    /// Parsed ticket creation time.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(lenient::parse_timestamp)
    }
}
