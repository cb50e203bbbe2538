//! Health check endpoint.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;
use crate::error::AppError;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,
    /// Database connectivity status
    pub database: String,
    /// Current server time
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// **Endpoint**: `GET /health`
///
/// Verifies the service is up and the key store is reachable. Used by
/// load balancers and uptime monitors; requires no API key.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.store.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
