//! Generation endpoint tests
//!
//! Covers bearer authentication, payload validation, the response
//! envelope, and the browser-facing method/CORS behavior.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use crate::common::{TEST_UPSTREAM, TestApp};

#[tokio::test]
async fn test_health_endpoint_returns_healthy() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;

    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn test_generate_without_authorization_header() {
    let app = TestApp::new().await;
    let response = app
        .post_json("/v1/generate", json!({ "prompt": "a cat" }))
        .await;

    response.assert_unauthorized();
    assert_eq!(
        response.error_message(),
        "Missing or malformed API key. Use: Authorization: Bearer alexzo_..."
    );
}

#[tokio::test]
async fn test_generate_rejects_malformed_authorization() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    // Wrong scheme, wrong prefix, no scheme at all: each fails the header
    // shape check before any key lookup.
    for authorization in [
        format!("Basic {key}"),
        "Bearer sk_live_abc123".to_string(),
        key.clone(),
    ] {
        let response = app
            .generate_raw(&authorization, Body::from(json!({ "prompt": "a cat" }).to_string()))
            .await;

        response.assert_unauthorized();
        assert_eq!(
            response.error_message(),
            "Missing or malformed API key. Use: Authorization: Bearer alexzo_...",
            "authorization value: {authorization}"
        );
    }
}

#[tokio::test]
async fn test_generate_with_unknown_key() {
    let app = TestApp::new().await;
    let response = app
        .generate("alexzo_unregistered0000000000000", json!({ "prompt": "a test prompt" }))
        .await;

    response.assert_unauthorized();
    assert_eq!(response.error_message(), "Invalid API key. Key not found.");
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    for scheme in ["Bearer", "bearer", "BEARER"] {
        let response = app
            .generate_raw(
                &format!("{scheme} {key}"),
                Body::from(json!({ "prompt": "a cat" }).to_string()),
            )
            .await;

        response.assert_ok();
    }
}

#[tokio::test]
async fn test_key_value_is_case_sensitive() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    // The upper-cased token still passes the shape check but must not
    // match the stored key.
    let response = app
        .generate(&key.to_uppercase(), json!({ "prompt": "a cat" }))
        .await;

    response.assert_unauthorized();
    assert_eq!(response.error_message(), "Invalid API key. Key not found.");
}

#[tokio::test]
async fn test_generate_returns_the_full_envelope() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "Test Key").await;

    let response = app
        .generate(&key, json!({ "prompt": "a test prompt" }))
        .await;
    response.assert_ok();

    let body: serde_json::Value = response.json();
    assert!(body["created"].as_i64().unwrap() > 0);
    assert_eq!(body["model"], "alexzo-v1");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["revised_prompt"], "a test prompt");
    assert_eq!(body["meta"]["user_ip"], "unknown");
    assert!(body["meta"]["note"].as_str().unwrap().contains("rate limit"));

    // The prompt is percent-encoded into the provider URL, with defaulted
    // dimensions and the upstream model name in the query.
    let url = body["data"][0]["url"].as_str().unwrap();
    assert!(
        url.starts_with(&format!("{TEST_UPSTREAM}/a%20test%20prompt?")),
        "unexpected url: {url}"
    );
    assert!(url.contains("width=512"));
    assert!(url.contains("height=512"));
    assert!(url.contains("nologo=true"));
    assert!(url.contains("enhance=true"));
    assert!(url.contains("model=flux"));
}

#[tokio::test]
async fn test_generate_rejects_missing_prompt() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    for body in [json!({}), json!({ "prompt": "" })] {
        let response = app.generate(&key, body).await;

        response.assert_bad_request();
        assert_eq!(response.error_message(), "Prompt is required.");
    }
}

#[tokio::test]
async fn test_generate_rejects_out_of_range_dimensions() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    for body in [
        json!({ "prompt": "a cat", "width": 2000 }),
        json!({ "prompt": "a cat", "height": 100 }),
        json!({ "prompt": "a cat", "width": 255, "height": 512 }),
        json!({ "prompt": "a cat", "width": 512, "height": 1025 }),
        json!({ "prompt": "a cat", "width": -5 }),
    ] {
        let response = app.generate(&key, body).await;

        response.assert_bad_request();
        let message = response.error_message();
        assert!(message.contains("256") && message.contains("1024"), "{message}");
    }
}

#[tokio::test]
async fn test_generate_accepts_boundary_dimensions() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    let response = app
        .generate(&key, json!({ "prompt": "a cat", "width": 256, "height": 1024 }))
        .await;
    response.assert_ok();

    let body: serde_json::Value = response.json();
    let url = body["data"][0]["url"].as_str().unwrap();
    assert!(url.contains("width=256"));
    assert!(url.contains("height=1024"));
}

#[tokio::test]
async fn test_generate_enforces_prompt_length() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    let at_limit = "x".repeat(1000);
    app.generate(&key, json!({ "prompt": at_limit })).await.assert_ok();

    let over_limit = "x".repeat(1001);
    let response = app.generate(&key, json!({ "prompt": over_limit })).await;
    response.assert_bad_request();
    assert_eq!(
        response.error_message(),
        "Prompt must be 1000 characters or less."
    );
}

#[tokio::test]
async fn test_generate_rejects_unparseable_bodies() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    for body in [Body::empty(), Body::from("not json")] {
        let response = app.generate_raw(&format!("Bearer {key}"), body).await;

        response.assert_bad_request();
        assert_eq!(response.error_message(), "Invalid JSON request body.");
    }
}

#[tokio::test]
async fn test_repeated_prompts_draw_fresh_seeds() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    let first: serde_json::Value = app
        .generate(&key, json!({ "prompt": "same prompt" }))
        .await
        .json();
    let second: serde_json::Value = app
        .generate(&key, json!({ "prompt": "same prompt" }))
        .await
        .json();

    assert_ne!(
        first["data"][0]["url"], second["data"][0]["url"],
        "two calls with the same prompt should embed different seeds"
    );
}

#[tokio::test]
async fn test_forwarded_client_ip_is_echoed() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/v1/generate")
                .header("Authorization", format!("Bearer {key}"))
                .header("Content-Type", "application/json")
                .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
                .body(Body::from(json!({ "prompt": "a cat" }).to_string()))
                .unwrap(),
        )
        .await;
    response.assert_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["meta"]["user_ip"], "203.0.113.7");
}

#[tokio::test]
async fn test_wrong_methods_get_405_without_a_key() {
    let app = TestApp::new().await;

    let response = app.get("/v1/generate").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.error_message(),
        "Method not allowed. Use POST to generate images."
    );

    let response = app
        .request(
            Request::builder()
                .method("PUT")
                .uri("/v1/generate")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_options_succeeds_without_a_key() {
    let app = TestApp::new().await;

    // Direct OPTIONS probe.
    let response = app
        .request(
            Request::builder()
                .method("OPTIONS")
                .uri("/v1/generate")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    response.assert_ok();

    // Browser preflight, answered by the CORS layer.
    let response = app
        .request(
            Request::builder()
                .method("OPTIONS")
                .uri("/v1/generate")
                .header("Origin", "https://studio.example")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    response.assert_ok();
    assert_eq!(
        response.headers["access-control-allow-origin"],
        "*",
        "preflight must allow any origin"
    );
}

#[tokio::test]
async fn test_generate_responses_are_cors_readable() {
    let app = TestApp::new().await;
    let (_, key) = app.issue_key("user-1", "key").await;

    // Success case.
    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/v1/generate")
                .header("Origin", "https://studio.example")
                .header("Authorization", format!("Bearer {key}"))
                .header("Content-Type", "application/json")
                .body(Body::from(json!({ "prompt": "a cat" }).to_string()))
                .unwrap(),
        )
        .await;
    response.assert_ok();
    assert_eq!(response.headers["access-control-allow-origin"], "*");

    // Auth failures must carry the header too, or browsers report an
    // opaque network error instead of the 401 envelope.
    let response = app
        .request(
            Request::builder()
                .method("POST")
                .uri("/v1/generate")
                .header("Origin", "https://studio.example")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({ "prompt": "a cat" }).to_string()))
                .unwrap(),
        )
        .await;
    response.assert_unauthorized();
    assert_eq!(response.headers["access-control-allow-origin"], "*");
}
