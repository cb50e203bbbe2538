//! Data models representing database entities and API payloads.
//!
//! This module contains all the data structures used throughout the
//! application for request/response bodies and persisted records.

/// API key records and issuance payloads
pub mod api_key;
/// Generation request/response payloads and validation
pub mod generation;
/// Usage log records
pub mod usage;
