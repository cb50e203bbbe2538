//! API key authentication middleware.
//!
//! This middleware gates the generation route. It:
//! 1. Extracts the bearer token from the `Authorization` header
//! 2. Enforces the `alexzo_` key shape before any database work
//! 3. Looks the exact key value up in the store
//! 4. Attaches [`AuthContext`] to the request and touches `last_used`
//! 5. Rejects failures with HTTP 401 and a JSON error envelope

use axum::{
    extract::{Request, State},
    http::{Method, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::AppState;
use crate::error::AppError;
use crate::services::key_service::KEY_PREFIX;

/// Authentication context attached to requests that passed validation.
///
/// Handlers read it back with `Extension<AuthContext>` to attribute the
/// call to a key and its owner.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Id of the authenticated API key
    pub api_key_id: Uuid,
    /// Owner of that key
    pub user_id: String,
}

/// Authenticate a generation request.
///
/// Only POST carries a generation payload; CORS preflights and
/// wrong-method probes pass through to their own handlers, which answer
/// without requiring a key.
///
/// # Errors
///
/// * [`AppError::MissingBearer`] when the header is absent or the token
///   does not look like an `alexzo_` key
/// * [`AppError::InvalidApiKey`] when the key is not registered
/// * [`AppError::StoreUnavailable`] when the store cannot be queried
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = extract_bearer_token(header).ok_or(AppError::MissingBearer)?;

    let record = state
        .store
        .find_by_key(token)
        .await
        .map_err(AppError::StoreUnavailable)?
        .ok_or(AppError::InvalidApiKey)?;

    // Best-effort: a failed timestamp write must not fail the request.
    if let Err(err) = state.store.touch_last_used(record.id).await {
        tracing::warn!("Failed to update last_used for key {}: {}", record.id, err);
    }

    request.extensions_mut().insert(AuthContext {
        api_key_id: record.id,
        user_id: record.user_id,
    });

    Ok(next.run(request).await)
}

/// Pull the key out of an `Authorization` header value.
///
/// The scheme word and the `alexzo_` prefix match case-insensitively, so
/// `bearer`, `Bearer`, and `BEARER` all pass, as does an upper-cased
/// prefix. The token itself is returned verbatim; the store compares it
/// case-sensitively.
fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let prefix = token.get(..KEY_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(KEY_PREFIX) {
        return None;
    }

    Some(token)
}
