//! Notification record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserRole;

use super::kind::{NotificationKind, Tone};

/// A notification derived from a ticket/event snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Stable id: `<role>:<entityId>:<suffix>`.
    pub id: String,
    /// Notification kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short title.
    pub headline: String,
    /// Body text.
    pub message: String,
    /// Visual tone.
    pub tone: Tone,
    /// Related event.
    pub event_id: String,
    /// Related event title.
    pub event_title: String,
    /// Event start, as received.
    #[serde(default)]
    pub event_date: Option<String>,
    /// Event venue.
    #[serde(default)]
    pub location: String,
    /// Event cover image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Sort timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the id is in the caller's read-marker set.
    #[serde(default)]
    pub is_read: bool,
}

impl NotificationRecord {
    /// Build the stable id for a notification of `kind` about `entity_id`.
    pub fn id_for(role: UserRole, entity_id: &str, kind: NotificationKind) -> String {
        format!("{}:{}:{}", role.as_str(), entity_id, kind.id_suffix())
    }

    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        assert_eq!(
            NotificationRecord::id_for(UserRole::Guest, "t-1", NotificationKind::TicketConfirmed),
            "guest:t-1:confirmed"
        );
        assert_eq!(
            NotificationRecord::id_for(UserRole::Guest, "e-7", NotificationKind::EventComplete),
            "guest:e-7:completed"
        );
    }
}
