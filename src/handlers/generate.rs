//! Image generation endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};

use crate::AppState;
use crate::client_ip;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::generation::{GenerateRequest, GenerateResponse};
use crate::models::usage::NewUsage;
use crate::services::image_service;

/// Generate an image URL for an authenticated caller.
///
/// **Endpoint**: `POST /v1/generate`
///
/// **Authentication**: `Authorization: Bearer alexzo_...` (enforced by the
/// auth middleware, which attaches [`AuthContext`])
///
/// **Request Body**:
/// ```json
/// {
///     "prompt": "a lighthouse at dusk",
///     "width": 512,
///     "height": 512
/// }
/// ```
///
/// **Response**: `200 OK` with the provider URL in `data[0].url`. The
/// caller fetches that URL itself; the gateway makes no upstream request.
///
/// **Errors**:
/// - `400 Bad Request`: unparseable body, missing prompt, dimensions
///   outside [256, 1024], or a prompt over 1000 characters
pub async fn generate_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    // An empty or malformed body gets the same 400 envelope as a field
    // validation failure, not axum's plain-text rejection.
    let Json(request) =
        body.map_err(|_| AppError::InvalidRequest("Invalid JSON request body.".to_string()))?;

    request.validate()?;

    let client_ip = client_ip::resolve(&headers);
    let response = image_service::build_generation_response(&state.upstream, &request, &client_ip);

    // Best-effort usage record; the response never depends on it.
    let usage = NewUsage {
        api_key_id: auth.api_key_id,
        user_id: auth.user_id,
        prompt_chars: request.prompt.chars().count() as i64,
        width: request.width,
        height: request.height,
        client_ip,
    };
    if let Err(err) = state.store.record_usage(&usage).await {
        tracing::warn!("Failed to record usage for key {}: {}", usage.api_key_id, err);
    }

    Ok(Json(response))
}

/// Answer OPTIONS probes on the generation route.
///
/// **Endpoint**: `OPTIONS /v1/generate`
///
/// Browser preflights are answered by the CORS layer before reaching this
/// handler; this covers direct OPTIONS probes, which succeed without a key.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Reject non-POST methods on the generation route.
///
/// Returns `405 Method Not Allowed` in the gateway's JSON error envelope
/// instead of axum's default empty response.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
