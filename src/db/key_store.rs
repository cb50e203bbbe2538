//! API key persistence.
//!
//! `KeyStore` is the single gateway-facing handle to the database: key
//! issuance, the hot validation lookup, listings, deletion, the account
//! teardown cascade, and usage recording all go through it. Handlers and
//! middleware receive the store through application state and never touch
//! the pool directly, so the backing store can be swapped out in tests.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::api_key::ApiKey;
use crate::models::usage::NewUsage;

/// Repository for API key records and usage rows.
#[derive(Clone)]
pub struct KeyStore {
    pool: DbPool,
    /// When set, keys are stored as SHA-256 hex digests instead of plaintext.
    hash_keys: bool,
}

/// Raw database row for an API key.
///
/// SQLite stores the id as TEXT; the public [`ApiKey`] model carries a
/// parsed [`Uuid`], so rows are converted on the way out.
#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: String,
    user_id: String,
    name: String,
    key: String,
    key_mask: String,
    created_at: DateTime<Utc>,
    last_used: Option<DateTime<Utc>>,
}

impl ApiKeyRow {
    fn into_api_key(self) -> Result<ApiKey, sqlx::Error> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|err| sqlx::Error::Decode(format!("invalid api key id: {err}").into()))?;

        Ok(ApiKey {
            id,
            user_id: self.user_id,
            name: self.name,
            key: self.key,
            key_mask: self.key_mask,
            created_at: self.created_at,
            last_used: self.last_used,
        })
    }
}

impl KeyStore {
    /// Create a store over an initialized pool.
    pub fn new(pool: DbPool, hash_keys: bool) -> Self {
        Self { pool, hash_keys }
    }

    /// The form a key takes in the `key` column.
    ///
    /// Plaintext by default. In hashed mode the SHA-256 hex digest is stored
    /// instead, and the same transform is applied to presented tokens before
    /// lookup, so validation works identically in both modes.
    fn stored_form(&self, key: &str) -> String {
        if self.hash_keys {
            let mut hasher = Sha256::new();
            hasher.update(key.as_bytes());
            hex::encode(hasher.finalize())
        } else {
            key.to_string()
        }
    }

    /// Insert a freshly generated key.
    ///
    /// Fails with a unique violation if the key value already exists; the
    /// issuance service retries with a new key in that case.
    pub async fn insert(
        &self,
        user_id: &str,
        name: &str,
        key: &str,
        key_mask: &str,
    ) -> Result<ApiKey, sqlx::Error> {
        let record = ApiKey {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            key: self.stored_form(key),
            key_mask: key_mask.to_string(),
            created_at: Utc::now(),
            last_used: None,
        };

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, user_id, name, key, key_mask, created_at, last_used)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.user_id)
        .bind(&record.name)
        .bind(&record.key)
        .bind(&record.key_mask)
        .bind(record.created_at)
        .bind(record.last_used)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Look up a key by its presented value.
    ///
    /// This is the hot path behind every generation request: one indexed
    /// point read on the unique `key` column. Matching is exact and
    /// case-sensitive; the caller passes the token verbatim.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, sqlx::Error> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, user_id, name, key, key_mask, created_at, last_used
            FROM api_keys
            WHERE key = $1
            "#,
        )
        .bind(self.stored_form(key))
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApiKeyRow::into_api_key).transpose()
    }

    /// Stamp a key's `last_used` with the current time.
    pub async fn touch_last_used(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE api_keys SET last_used = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// All keys belonging to a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ApiKey>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, user_id, name, key, key_mask, created_at, last_used
            FROM api_keys
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ApiKeyRow::into_api_key).collect()
    }

    /// Delete one key, scoped to its owner.
    ///
    /// Returns `false` when no row matched, which covers both an unknown id
    /// and an id owned by a different user.
    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(id.to_string())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every gateway record belonging to a user.
    ///
    /// Used during account teardown. Each table is attempted independently:
    /// a failure on one never skips the others. Failures are logged per
    /// table and the first error is returned once all tables have been
    /// tried.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<(), sqlx::Error> {
        let mut first_error = None;

        for table in ["api_keys", "usage_log"] {
            let statement = format!("DELETE FROM {table} WHERE user_id = $1");
            if let Err(err) = sqlx::query(&statement).bind(user_id).execute(&self.pool).await {
                tracing::error!("Failed to delete {} rows for user {}: {}", table, user_id, err);
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Append a usage row for a completed generation call.
    pub async fn record_usage(&self, usage: &NewUsage) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO usage_log (id, api_key_id, user_id, prompt_chars, width, height, client_ip, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(usage.api_key_id.to_string())
        .bind(&usage.user_id)
        .bind(usage.prompt_chars)
        .bind(usage.width)
        .bind(usage.height)
        .bind(&usage.client_ip)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of usage rows recorded for a user.
    pub async fn usage_count_for_user(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM usage_log WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Cheap connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
