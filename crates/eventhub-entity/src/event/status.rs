//! Event moderation status.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Moderation status of an event.
///
/// Only approved events are visible to guests and produce notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Awaiting admin review.
    #[default]
    Pending,
    /// Published.
    Approved,
    /// Turned down by an admin.
    Rejected,
    /// A status string this build does not recognise.
    Unknown,
}

impl EventStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a status leniently; unrecognised values map to `Unknown`.
    pub fn from_str_value(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = crate::lenient::opt_string(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Self::from_str_value)
            .unwrap_or_default())
    }
}
