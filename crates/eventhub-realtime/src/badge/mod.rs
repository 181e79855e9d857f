//! Unread notification badge.

pub mod store;

pub use store::{BadgeCallback, BadgeChange, BadgeStore};
