//! API key issuance and management endpoints.
//!
//! These routes sit behind the account-holding web app, which authenticates
//! its own users and forwards their user id. They are deliberately not
//! gated by the bearer middleware: a user must be able to issue their first
//! key before they have one.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::models::api_key::{ApiKeyResponse, CreateApiKeyRequest};
use crate::services::key_service;

/// Query parameters naming the acting user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(alias = "userId")]
    pub user_id: String,
}

/// Issue a new API key.
///
/// **Endpoint**: `POST /v1/keys`
///
/// **Request Body**:
/// ```json
/// {
///     "name": "CLI key",
///     "user_id": "user-1"
/// }
/// ```
///
/// **Response**: `201 Created` with the full key in `key`. This is the only
/// response that ever carries the plaintext; callers must store it.
pub async fn create_api_key(
    State(state): State<AppState>,
    body: Result<Json<CreateApiKeyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), AppError> {
    let Json(request) =
        body.map_err(|_| AppError::InvalidRequest("Invalid JSON request body.".to_string()))?;

    let (record, plaintext) = key_service::issue_key(&state.store, &request).await?;
    tracing::info!("Issued API key {} for user {}", record.id, record.user_id);

    Ok((
        StatusCode::CREATED,
        Json(ApiKeyResponse::issued(&record, plaintext)),
    ))
}

/// List a user's API keys.
///
/// **Endpoint**: `GET /v1/keys?user_id=...`
///
/// **Response**: `200 OK` with the user's keys, newest first. Key values
/// are masked; only issuance returns a usable key.
pub async fn list_api_keys(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let Query(query) =
        query.map_err(|_| AppError::InvalidRequest("user_id is required.".to_string()))?;
    if query.user_id.is_empty() {
        return Err(AppError::InvalidRequest("user_id is required.".to_string()));
    }

    let keys = state.store.list_for_user(&query.user_id).await?;

    Ok(Json(keys.into_iter().map(ApiKeyResponse::from).collect()))
}

/// Revoke one API key.
///
/// **Endpoint**: `DELETE /v1/keys/{id}?user_id=...`
///
/// Deletion is scoped to the owner: an id that exists but belongs to
/// another user reads as not found.
///
/// **Response**: `204 No Content`, or `404 Not Found`.
pub async fn delete_api_key(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(|_| AppError::InvalidRequest("Invalid key id.".to_string()))?;
    let Query(query) =
        query.map_err(|_| AppError::InvalidRequest("user_id is required.".to_string()))?;
    let deleted = state.store.delete(&query.user_id, id).await?;

    if !deleted {
        return Err(AppError::ApiKeyNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Remove all gateway data for a user.
///
/// **Endpoint**: `DELETE /v1/users/{user_id}`
///
/// Called by the web app when an account is deleted. Removes the user's
/// keys and usage rows; every key stops authenticating immediately.
///
/// **Response**: `204 No Content`. Unknown users succeed as a no-op, so
/// account deletion can be retried safely.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_user_data(&user_id).await?;
    tracing::info!("Deleted all gateway data for user {}", user_id);

    Ok(StatusCode::NO_CONTENT)
}
