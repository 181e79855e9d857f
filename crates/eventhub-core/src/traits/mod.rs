//! Core traits defined in `eventhub-core` and implemented by other crates.

pub mod store;

pub use store::{KeyValueStore, StoreChange};
