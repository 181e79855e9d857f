//! # eventhub-cache
//!
//! Durable key-value stores shared by every EventHub execution context.
//! Supports two modes:
//!
//! - **memory**: In-process store using [moka](https://crates.io/crates/moka);
//!   contexts in the same process share one instance.
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis)
//!   crate; changes are announced over pub/sub so other processes see them.
//!
//! The provider is selected at runtime based on configuration.

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
