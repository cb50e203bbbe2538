//! Generation request/response payloads and their validation.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Smallest accepted image dimension, in pixels.
pub const MIN_DIMENSION: i64 = 256;
/// Largest accepted image dimension, in pixels.
pub const MAX_DIMENSION: i64 = 1024;
/// Dimension applied when the request omits width or height.
pub const DEFAULT_DIMENSION: i64 = 512;
/// Longest accepted prompt, counted in characters rather than bytes.
pub const MAX_PROMPT_CHARS: usize = 1000;

/// Request body for `POST /v1/generate`.
///
/// Only `prompt` is required; omitted dimensions default to 512x512.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Text prompt to render
    #[serde(default)]
    pub prompt: String,
    /// Output width in pixels; i64 so out-of-range values reach `validate`
    /// instead of failing deserialization
    #[serde(default = "default_dimension")]
    pub width: i64,
    /// Output height in pixels
    #[serde(default = "default_dimension")]
    pub height: i64,
}

fn default_dimension() -> i64 {
    DEFAULT_DIMENSION
}

impl GenerateRequest {
    /// Validate the payload.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. The prompt must be present and non-empty
    /// 2. Width and height must fall within [256, 1024]
    /// 3. The prompt must be at most 1000 characters
    ///
    /// So a request with an empty prompt and a width of 2000 reports the
    /// missing prompt, not the dimensions.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.prompt.is_empty() {
            return Err(AppError::MissingPrompt);
        }

        if !dimension_in_range(self.width) || !dimension_in_range(self.height) {
            return Err(AppError::DimensionsOutOfRange);
        }

        if self.prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(AppError::PromptTooLong);
        }

        Ok(())
    }
}

fn dimension_in_range(value: i64) -> bool {
    (MIN_DIMENSION..=MAX_DIMENSION).contains(&value)
}

/// Response body for a successful generation call.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Unix timestamp (seconds) of when the response was assembled
    pub created: i64,
    /// Public model label, not the upstream model name
    pub model: String,
    /// Generated images; currently always exactly one entry
    pub data: Vec<GeneratedImage>,
    /// Request metadata echoed back to the caller
    pub meta: ResponseMeta,
}

/// One generated image.
#[derive(Debug, Serialize)]
pub struct GeneratedImage {
    /// Provider URL the client fetches to obtain the actual image
    pub url: String,
    /// Echoes the input prompt; the gateway does no prompt rewriting
    pub revised_prompt: String,
}

/// Metadata block attached to every generation response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    /// Client IP the gateway resolved for this request
    pub user_ip: String,
    /// Explains that the image URL is fetched client-side
    pub note: String,
}
