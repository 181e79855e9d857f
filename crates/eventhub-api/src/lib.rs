//! # eventhub-api
//!
//! HTTP API layer for EventHub built on Axum.
//!
//! Serves the derived notification feed and unread count to bearer-token
//! authenticated callers, plus a health endpoint. Provides the auth
//! extractor, middleware (CORS, compression, logging), DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
