//! Notification feed derivation.

pub mod service;
pub mod source;
pub mod synthesizer;

pub use service::NotificationFeedService;
pub use source::{InMemoryTicketSource, TicketSource};
pub use synthesizer::{NotificationSynthesizer, NotificationWindows, synthesize};
