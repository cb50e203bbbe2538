//! HTTP request handlers.
//!
//! Handlers translate between HTTP and the gateway's services: they parse
//! and validate payloads, call into the store and services, and map
//! results onto status codes and JSON bodies.

/// Image generation endpoint
pub mod generate;
/// Health check endpoint
pub mod health;
/// API key issuance and management endpoints
pub mod keys;
