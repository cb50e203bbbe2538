//! Common test utilities
//!
//! Shared infrastructure for integration tests: an in-process gateway
//! over an in-memory database, plus a response wrapper with assertion
//! helpers.

pub mod test_app;

pub use test_app::*;
