//! API key issuance.
//!
//! Generates `alexzo_`-prefixed keys, masks them for display, and inserts
//! them with a bounded retry against the store's unique index.

use rand::Rng;

use crate::db::KeyStore;
use crate::error::AppError;
use crate::models::api_key::{ApiKey, CreateApiKeyRequest};

/// Prefix carried by every issued key.
///
/// The bearer authenticator rejects tokens without it before touching the
/// store, and it lets leaked keys be recognized in logs and secret scans.
pub const KEY_PREFIX: &str = "alexzo_";

/// Longest accepted key label.
pub const MAX_NAME_CHARS: usize = 50;

/// Alphabet for the random key body: lowercase base-36.
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of one random segment; a full key carries two.
const SEGMENT_LEN: usize = 13;

/// Issuance attempts before giving up on a unique key value.
const MAX_INSERT_ATTEMPTS: usize = 3;

/// Generate a new API key string.
///
/// Format: `alexzo_` followed by 26 random base-36 characters (two
/// 13-character segments, about 134 bits). Generation itself makes no
/// uniqueness claim; the store's unique index is the arbiter.
pub fn generate_key() -> String {
    let mut rng = rand::rng();
    let mut key = String::with_capacity(KEY_PREFIX.len() + 2 * SEGMENT_LEN);
    key.push_str(KEY_PREFIX);

    for _ in 0..2 * SEGMENT_LEN {
        let index = rng.random_range(0..BASE36.len());
        key.push(BASE36[index] as char);
    }

    key
}

/// Display form of a key: the prefix plus the last four characters.
///
/// Generated keys are ASCII, so byte slicing is safe here.
fn mask_key(key: &str) -> String {
    let tail_start = key.len().saturating_sub(4);
    format!("{}...{}", KEY_PREFIX, &key[tail_start..])
}

/// Issue a new key for a user.
///
/// Validates the request, generates a fresh key, and inserts it. On the
/// astronomically unlikely unique-index collision the key is regenerated,
/// up to a small bounded number of attempts.
///
/// Returns the persisted record together with the plaintext key. The
/// plaintext leaves this function exactly once; in hashed mode it is not
/// recoverable from the store afterwards.
pub async fn issue_key(
    store: &KeyStore,
    request: &CreateApiKeyRequest,
) -> Result<(ApiKey, String), AppError> {
    if request.user_id.is_empty() {
        return Err(AppError::InvalidRequest("user_id is required.".to_string()));
    }

    if request.name.is_empty() || request.name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::InvalidRequest(format!(
            "Name must be between 1 and {MAX_NAME_CHARS} characters."
        )));
    }

    for _ in 0..MAX_INSERT_ATTEMPTS {
        let key = generate_key();
        let mask = mask_key(&key);

        match store.insert(&request.user_id, &request.name, &key, &mask).await {
            Ok(record) => return Ok((record, key)),
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!("Generated key collided with an existing key, retrying");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Internal(format!(
        "could not allocate a unique API key after {MAX_INSERT_ATTEMPTS} attempts"
    )))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
