//! Integration tests for the gateway
//!
//! These tests exercise the API endpoints with a real (in-memory)
//! database and all middleware in place.

mod generate_tests;
