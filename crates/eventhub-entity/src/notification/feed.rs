//! Wire shape of a notification feed response.

use serde::{Deserialize, Serialize};

use super::model::NotificationRecord;

/// Feed body returned by the notification endpoint.
///
/// Older clients and the organizer dashboard emit the list under
/// `activities`; both spellings deserialize into `notifications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    /// Derived notifications, most recent first.
    #[serde(default, alias = "activities")]
    pub notifications: Vec<NotificationRecord>,
    /// Server-side unread count, when the endpoint reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u64>,
}

impl NotificationFeed {
    /// Build a feed, reporting the number of unread records.
    pub fn new(notifications: Vec<NotificationRecord>) -> Self {
        let unread = notifications.iter().filter(|n| n.is_unread()).count() as u64;
        Self {
            notifications,
            unread_count: Some(unread),
        }
    }
}

/// Body of the unread-count endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    /// Number of unread notifications.
    pub unread_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activities_alias() {
        let feed: NotificationFeed = serde_json::from_str(r#"{ "activities": [] }"#).unwrap();
        assert!(feed.notifications.is_empty());
        assert_eq!(feed.unread_count, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(NotificationFeed::new(Vec::new())).unwrap();
        assert_eq!(json, serde_json::json!({ "notifications": [], "unreadCount": 0 }));
    }
}
