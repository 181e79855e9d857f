//! Notification synthesis and unread badge configuration.

use serde::{Deserialize, Serialize};

/// Time windows used when deriving notifications from ticket records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Events starting within this many hours produce a reminder.
    #[serde(default = "default_reminder_window_hours")]
    pub reminder_window_hours: i64,
    /// Events starting within this many days (beyond the reminder window)
    /// produce an upcoming notice.
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
    /// Events that ended up to this many days ago produce a follow-up.
    #[serde(default = "default_follow_up_window_days")]
    pub follow_up_window_days: i64,
    /// Offset from the event date used as the follow-up timestamp.
    #[serde(default = "default_follow_up_offset_hours")]
    pub follow_up_offset_hours: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            reminder_window_hours: default_reminder_window_hours(),
            upcoming_window_days: default_upcoming_window_days(),
            follow_up_window_days: default_follow_up_window_days(),
            follow_up_offset_hours: default_follow_up_offset_hours(),
        }
    }
}

/// Unread badge persistence and broadcast settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Well-known durable store key holding the badge value.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Capacity of the same-context broadcast channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_reminder_window_hours() -> i64 {
    24
}

fn default_upcoming_window_days() -> i64 {
    7
}

fn default_follow_up_window_days() -> i64 {
    3
}

fn default_follow_up_offset_hours() -> i64 {
    12
}

fn default_storage_key() -> String {
    "eventhub:notifications:unread-count".to_string()
}

fn default_channel_capacity() -> usize {
    16
}
