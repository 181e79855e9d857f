//! # eventhub-service
//!
//! Business logic service layer for EventHub. The notification synthesizer
//! derives feeds from ticket snapshots, ticket sources supply those
//! snapshots, and the session resolver turns bearer tokens into request
//! contexts.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notification;
pub mod session;

pub use context::RequestContext;
pub use notification::{
    InMemoryTicketSource, NotificationFeedService, NotificationSynthesizer, NotificationWindows,
    TicketSource, synthesize,
};
pub use session::{SessionResolver, StaticSessionResolver};
