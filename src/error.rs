//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Authentication Errors**: missing/malformed bearer headers, unknown
///   keys, store failures during validation
/// - **Validation Errors**: invalid generation or issuance payloads
/// - **Resource Errors**: requested records not found
/// - **Database Errors**: any sqlx::Error outside the key-validation path
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Authorization header is absent or does not match `Bearer alexzo_...`.
    ///
    /// Returns HTTP 401 Unauthorized. The message spells out the expected
    /// header format so callers can correct it.
    #[error("Missing or malformed API key. Use: Authorization: Bearer alexzo_...")]
    MissingBearer,

    /// The presented key is well-formed but not registered in the store.
    ///
    /// Returns HTTP 401 Unauthorized with a distinct "not found" message.
    #[error("Invalid API key. Key not found.")]
    InvalidApiKey,

    /// The key store could not be reached while validating a key.
    ///
    /// Deliberately surfaced as HTTP 401 rather than a 5xx so external
    /// callers cannot distinguish infrastructure failure from a bad key.
    /// The root cause is logged server-side only.
    #[error("API key validation failed. Check server logs.")]
    StoreUnavailable(#[source] sqlx::Error),

    /// Generation request has no prompt (absent or empty string).
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Prompt is required.")]
    MissingPrompt,

    /// Requested width or height falls outside the accepted range.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Width and height must be between 256 and 1024.")]
    DimensionsOutOfRange,

    /// Prompt exceeds the maximum accepted length.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Prompt must be 1000 characters or less.")]
    PromptTooLong,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// Requested API key record does not exist or belongs to another user.
    ///
    /// Returns HTTP 404 Not Found. Only produced by the issuance surface;
    /// the validation path reports unknown keys as [`AppError::InvalidApiKey`].
    #[error("API key not found.")]
    ApiKeyNotFound,

    /// Generation endpoint was called with anything other than POST.
    ///
    /// Returns HTTP 405 Method Not Allowed.
    #[error("Method not allowed. Use POST to generate images.")]
    MethodNotAllowed,

    /// Internal invariant failed (e.g. key allocation exhausted its retry
    /// budget). The message is logged, never sent to the client.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("{0}")]
    Internal(String),

    /// Database operation failed outside the key-validation path.
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    /// Returns HTTP 500 Internal Server Error; details stay in the logs.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return a flat JSON envelope:
/// ```json
/// { "error": "Human-readable error message" }
/// ```
///
/// # Status Code Mapping
///
/// - `MissingBearer` / `InvalidApiKey` / `StoreUnavailable` → 401 Unauthorized
/// - `MissingPrompt` / `DimensionsOutOfRange` / `PromptTooLong` / `InvalidRequest` → 400 Bad Request
/// - `ApiKeyNotFound` → 404 Not Found
/// - `MethodNotAllowed` → 405 Method Not Allowed
/// - `Internal` / `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingBearer | AppError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::StoreUnavailable(ref source) => {
                tracing::error!("API key lookup failed: {}", source);
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::MissingPrompt
            | AppError::DimensionsOutOfRange
            | AppError::PromptTooLong
            | AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::ApiKeyNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            AppError::Internal(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(ref source) => {
                tracing::error!("Database error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}
