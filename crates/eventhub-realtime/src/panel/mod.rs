//! Notification panel: visibility state machine and feed fetching.

pub mod fetcher;
pub mod machine;
pub mod state;

pub use fetcher::{HttpNotificationFetcher, NotificationFetcher};
pub use machine::{NotificationPanel, PanelTimings};
pub use state::{Bounds, PanelKey, PanelSnapshot, PanelVisibility, Point};
