//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use anyhow::{Context, bail};
use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to a local file store
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `UPSTREAM_BASE_URL` (optional): image provider base URL the gateway builds links against
/// - `UPSTREAM_MODEL` (optional): model selected via query parameter on the provider URL
/// - `MODEL_LABEL` (optional): model identifier reported in generation responses
/// - `HASH_KEYS` (optional): store SHA-256 digests instead of plaintext keys, defaults to false
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    #[serde(default = "default_upstream_model")]
    pub upstream_model: String,

    #[serde(default = "default_model_label")]
    pub model_label: String,

    #[serde(default)]
    pub hash_keys: bool,
}

/// Default SQLite store if DATABASE_URL is not set. `mode=rwc` creates the
/// database file on first start.
fn default_database_url() -> String {
    "sqlite:alexzo.db?mode=rwc".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    8080
}

fn default_upstream_base_url() -> String {
    "https://image.pollinations.ai/prompt".to_string()
}

fn default_upstream_model() -> String {
    "flux".to_string()
}

fn default_model_label() -> String {
    "alexzo-v1".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// the expected types.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}

/// Validated upstream provider settings carried in application state.
///
/// Built once at startup so every generation request can assemble a provider
/// URL without re-validating configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Provider base URL, scheme-checked, without a trailing slash.
    pub base_url: String,

    /// Model selected on the provider via the `model` query parameter.
    pub model: String,

    /// Model identifier echoed in the generation response envelope.
    pub model_label: String,
}

impl UpstreamConfig {
    /// Validate the raw upstream settings from [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if `UPSTREAM_BASE_URL` is not a valid absolute
    /// http(s) URL.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let parsed = Url::parse(&config.upstream_base_url)
            .context("UPSTREAM_BASE_URL is not a valid URL")?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => bail!("UPSTREAM_BASE_URL must use http or https, got {other}"),
        }

        Ok(Self {
            base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            model: config.upstream_model.clone(),
            model_label: config.model_label.clone(),
        })
    }
}
