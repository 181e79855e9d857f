//! Ticket domain entities.

pub mod model;

pub use model::TicketWithEvent;
