//! Business logic services.
//!
//! Services contain the core gateway logic, separated from HTTP handling:
//! key generation and issuance, and provider URL construction.

/// Provider URL construction and response assembly
pub mod image_service;
/// Key generation, masking, and collision-safe issuance
pub mod key_service;
