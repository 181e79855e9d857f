//! Workspace integration tests.

mod helpers;
mod notification_test;
mod panel_test;
