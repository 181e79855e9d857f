//! Session control: ending a session the API no longer accepts.

pub mod invalidation;

pub use invalidation::SessionInvalidator;
