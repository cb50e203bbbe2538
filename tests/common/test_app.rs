//! Test application setup utilities
//!
//! Provides an in-process instance of the gateway backed by an in-memory
//! SQLite database, driven through the router without opening a socket.

use axum::{Router, body::Body, http::Request};
use tower::ServiceExt;

use alexzo_gateway::{AppState, KeyStore, UpstreamConfig, db, router};

/// Upstream base URL configured for every test app.
pub const TEST_UPSTREAM: &str = "https://image.example.test/prompt";

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    /// Create a gateway over a fresh in-memory database, storing keys in
    /// plaintext (the default mode).
    pub async fn new() -> Self {
        Self::with_hashed_keys(false).await
    }

    /// Create a gateway that stores key digests instead of plaintext.
    pub async fn with_hashed_keys(hash_keys: bool) -> Self {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("Failed to open in-memory test database");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState {
            store: KeyStore::new(pool, hash_keys),
            upstream: UpstreamConfig {
                base_url: TEST_UPSTREAM.to_string(),
                model: "flux".to_string(),
                model_label: "alexzo-v1".to_string(),
            },
        };

        Self {
            router: router(state),
        }
    }

    /// Make a GET request to the test application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST to the generation endpoint with a raw Authorization header value.
    pub async fn generate_raw(&self, authorization: &str, body: Body) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri("/v1/generate")
                .header("Authorization", authorization)
                .header("Content-Type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
    }

    /// POST to the generation endpoint with a bearer key and JSON body.
    pub async fn generate(&self, key: &str, body: serde_json::Value) -> TestResponse {
        self.generate_raw(&format!("Bearer {key}"), Body::from(body.to_string()))
            .await
    }

    /// Issue a key through the API and return `(key id, plaintext key)`.
    pub async fn issue_key(&self, user_id: &str, name: &str) -> (String, String) {
        let response = self
            .post_json(
                "/v1/keys",
                serde_json::json!({ "name": name, "user_id": user_id }),
            )
            .await;
        response.assert_created();

        let json: serde_json::Value = response.json();
        (
            json["id"].as_str().expect("key id").to_string(),
            json["key"].as_str().expect("plaintext key").to_string(),
        )
    }

    /// Make an arbitrary request
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse response as JSON")
    }

    /// The `error` field of the JSON error envelope
    pub fn error_message(&self) -> String {
        let json: serde_json::Value = self.json();
        json["error"]
            .as_str()
            .expect("error envelope should carry a message")
            .to_string()
    }

    /// Assert the response status
    pub fn assert_status(&self, expected: axum::http::StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::OK)
    }

    /// Assert the response status is Created (201)
    pub fn assert_created(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::CREATED)
    }

    /// Assert the response status is Bad Request (400)
    pub fn assert_bad_request(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::BAD_REQUEST)
    }

    /// Assert the response status is Unauthorized (401)
    pub fn assert_unauthorized(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::UNAUTHORIZED)
    }

    /// Assert the response status is Not Found (404)
    pub fn assert_not_found(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::NOT_FOUND)
    }
}
