//! Event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;

use super::status::EventStatus;

/// An event as embedded in a ticket snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier.
    #[serde(default, alias = "_id", deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,
    /// Event title.
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub title: String,
    /// Start date (raw, parsed on use).
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub date: Option<String>,
    /// End date (raw).
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub end_date: Option<String>,
    /// End time of day (raw).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub end_time: Option<String>,
    /// Venue.
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub location: String,
    /// Cover image URL.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image_url: Option<String>,
    /// Moderation status.
    #[serde(default)]
    pub status: EventStatus,
}

impl Event {
    /// Whether the event is published.
    pub fn is_approved(&self) -> bool {
        self.status == EventStatus::Approved
    }

    /// Parsed start timestamp, if the raw date is usable.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(lenient::parse_timestamp)
    }
}
