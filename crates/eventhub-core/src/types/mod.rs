//! Shared value types used across EventHub crates.

pub mod id;

pub use id::{ContextId, ListenerId};
