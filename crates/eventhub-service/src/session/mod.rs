//! Bearer-token session resolution.

pub mod resolver;

pub use resolver::{SessionResolver, StaticSessionResolver};
