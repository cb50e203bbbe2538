//! Middleware for request processing.
//!
//! Middleware intercepts requests before they reach handlers, for
//! cross-cutting concerns like authentication.

/// API key authentication middleware
pub mod auth;
