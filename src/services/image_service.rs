//! Provider URL construction and generation response assembly.
//!
//! The gateway never fetches an image itself. It constructs the upstream
//! provider URL and hands it back to the caller, whose client fetches the
//! image from its own network. The provider rate-limits per requesting IP,
//! so this design attributes that limit to each end user instead of the
//! gateway's single egress address.

use chrono::Utc;
use rand::Rng;

use crate::config::UpstreamConfig;
use crate::models::generation::{GenerateRequest, GenerateResponse, GeneratedImage, ResponseMeta};

/// Largest seed (inclusive) embedded in provider URLs.
const MAX_SEED: u32 = 999_999;

/// Note attached to every response, explaining the client-side fetch.
const CLIENT_FETCH_NOTE: &str = "Fetch the image URL from your client. Downloads count against \
     your IP address rather than the API server, so the provider's rate limit applies per user.";

/// Draw a random seed for one provider URL.
///
/// A fresh seed per call makes the provider produce a different image even
/// when the same prompt is submitted twice.
fn random_seed() -> u32 {
    rand::rng().random_range(0..=MAX_SEED)
}

/// Build the fully-qualified provider URL for one generation.
///
/// The prompt is percent-encoded into the URL path. `nologo` suppresses the
/// provider's watermark and `enhance` turns on its prompt enrichment; both
/// are fixed gateway policy rather than caller options.
pub fn build_image_url(
    upstream: &UpstreamConfig,
    prompt: &str,
    width: i64,
    height: i64,
    seed: u32,
) -> String {
    format!(
        "{}/{}?width={}&height={}&seed={}&nologo=true&enhance=true&model={}",
        upstream.base_url,
        urlencoding::encode(prompt),
        width,
        height,
        seed,
        upstream.model,
    )
}

/// Assemble the response envelope for a validated generation request.
///
/// Pure construction, no network call. `model` reports the public model
/// label, and `revised_prompt` echoes the input prompt unchanged.
pub fn build_generation_response(
    upstream: &UpstreamConfig,
    request: &GenerateRequest,
    client_ip: &str,
) -> GenerateResponse {
    let url = build_image_url(
        upstream,
        &request.prompt,
        request.width,
        request.height,
        random_seed(),
    );

    GenerateResponse {
        created: Utc::now().timestamp(),
        model: upstream.model_label.clone(),
        data: vec![GeneratedImage {
            url,
            revised_prompt: request.prompt.clone(),
        }],
        meta: ResponseMeta {
            user_ip: client_ip.to_string(),
            note: CLIENT_FETCH_NOTE.to_string(),
        },
    }
}
