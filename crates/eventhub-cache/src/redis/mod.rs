//! Redis durable store.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisStore;
