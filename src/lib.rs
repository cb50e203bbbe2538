//! API key issuance and validation gateway for a hosted image-generation
//! service.
//!
//! The gateway does two jobs:
//! - **Issuance**: mints, lists, and revokes `alexzo_`-prefixed API keys on
//!   behalf of the account-holding web app
//! - **Validation**: authenticates generation calls by bearer key, checks
//!   the payload, and returns a ready-to-fetch upstream provider URL
//!
//! It never fetches images itself. Clients fetch the returned URL from
//! their own network, so the provider's per-IP rate limit lands on each
//! end user instead of this server.

pub mod client_ip;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    Router,
    http::{Method, header},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::{Config, UpstreamConfig};
pub use db::{DbPool, KeyStore};
pub use error::AppError;

/// Application state shared across handlers.
///
/// Cloned per request by axum; both fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Key store, constructed by the hosting process and injected here
    pub store: KeyStore,
    /// Validated upstream provider settings
    pub upstream: UpstreamConfig,
}

/// Build the gateway router.
///
/// Routes:
/// - `POST /v1/generate` - bearer-gated generation endpoint, CORS-open so
///   browser apps can call it from any origin (OPTIONS answers 200 and
///   other methods 405, both without a key)
/// - `POST /v1/keys`, `GET /v1/keys` - issue and list keys
/// - `DELETE /v1/keys/{id}` - revoke one key
/// - `DELETE /v1/users/{user_id}` - account teardown cascade
/// - `GET /health` - liveness and database probe
pub fn router(state: AppState) -> Router {
    // Only the generation endpoint is browser-facing; the issuance surface
    // is called server-side by the web app and gets no CORS layer.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let generation = Router::new()
        .route(
            "/v1/generate",
            post(handlers::generate::generate_image)
                .options(handlers::generate::preflight)
                .fallback(handlers::generate::method_not_allowed),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/v1/keys",
            post(handlers::keys::create_api_key).get(handlers::keys::list_api_keys),
        )
        .route("/v1/keys/{id}", delete(handlers::keys::delete_api_key))
        .route("/v1/users/{user_id}", delete(handlers::keys::delete_user))
        .merge(generation)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
