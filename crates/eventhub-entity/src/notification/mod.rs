//! Notification domain values.
//!
//! Notifications are derived on read and never persisted.

pub mod feed;
pub mod kind;
pub mod model;
pub mod read_marker;

pub use feed::{NotificationFeed, UnreadCount};
pub use kind::{NotificationKind, Tone};
pub use model::NotificationRecord;
pub use read_marker::ReadMarkerSet;
