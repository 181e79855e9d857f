//! # eventhub-entity
//!
//! Domain entity models for EventHub. Ticket and event structs mirror the
//! snapshots handed over by the external data layer; notification records
//! are value objects derived from them and never stored.

pub mod event;
pub mod lenient;
pub mod notification;
pub mod ticket;
pub mod user;
