//! API key record and the payloads of the issuance surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An issued API key.
///
/// Represents a row in the `api_keys` table.
#[derive(Debug, Clone)]
pub struct ApiKey {
    /// Unique identifier, assigned by the store at issuance
    pub id: Uuid,
    /// Owning user in the account system fronting this gateway
    pub user_id: String,
    /// Human-readable label chosen by the user ("CLI key", "staging")
    pub name: String,
    /// Stored key value: the plaintext key, or its SHA-256 hex digest when
    /// the store runs in hashed mode
    pub key: String,
    /// Display form captured at issuance (`alexzo_...` plus the last four
    /// characters), safe to return in listings
    pub key_mask: String,
    /// When the key was issued
    pub created_at: DateTime<Utc>,
    /// When the key last authenticated a generation call, if ever
    pub last_used: Option<DateTime<Utc>>,
}

/// Request body for issuing a new API key.
///
/// The issuance surface sits behind the account-holding web app, which
/// supplies the user id on behalf of the signed-in user.
#[derive(Debug, Deserialize)]
pub struct CreateApiKeyRequest {
    /// Label for the key
    pub name: String,
    /// Owning user
    #[serde(alias = "userId")]
    pub user_id: String,
}

/// API key as returned by the issuance endpoints.
///
/// The `key` field carries the full plaintext exactly once, in the 201
/// issuance response. Listings substitute the stored mask, so a key that
/// leaves the issuance response can never be read back.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub created: DateTime<Utc>,
    #[serde(rename = "lastUsed")]
    pub last_used: Option<DateTime<Utc>>,
}

impl ApiKeyResponse {
    /// Issuance response: carries the plaintext key.
    pub fn issued(record: &ApiKey, plaintext_key: String) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            key: plaintext_key,
            created: record.created_at,
            last_used: record.last_used,
        }
    }
}

/// Listing response: the key value is replaced by its mask.
impl From<ApiKey> for ApiKeyResponse {
    fn from(record: ApiKey) -> Self {
        Self {
            id: record.id,
            name: record.name,
            key: record.key_mask,
            created: record.created_at,
            last_used: record.last_used,
        }
    }
}
