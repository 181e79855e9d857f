//! # eventhub-realtime
//!
//! Client-side notification state for EventHub. Provides:
//!
//! - The unread badge store, an observable value kept in sync across every
//!   context sharing a durable store
//! - The notification panel state machine with its open/close animation
//!   timers and at-most-one fetch per open cycle
//! - Session invalidation when the notification API rejects the session

pub mod badge;
pub mod panel;
pub mod session_control;

pub use badge::{BadgeChange, BadgeStore};
pub use panel::{HttpNotificationFetcher, NotificationFetcher, NotificationPanel, PanelSnapshot};
pub use session_control::SessionInvalidator;
