//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing a SQLite connection pool
//! - Running database migrations automatically

pub mod key_store;

pub use key_store::KeyStore;

use sqlx::{Pool, Sqlite};

/// Type alias for SQLite connection pool.
///
/// Instead of writing `Pool<Sqlite>` everywhere, we can use `DbPool`.
pub type DbPool = Pool<Sqlite>;

/// Create a new SQLite connection pool.
///
/// A connection pool maintains database connections that are reused across
/// HTTP requests instead of being reopened per request.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string, e.g. `sqlite:alexzo.db?mode=rwc`
///   or `sqlite::memory:`
///
/// # Errors
///
/// Returns an error if:
/// - The connection string is invalid
/// - The database file cannot be opened or created
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    // Every connection to an in-memory SQLite URL opens its own private
    // database, so a memory store must be pinned to a single connection.
    let max_connections = if is_in_memory(database_url) { 1 } else { 5 };

    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Run database migrations from the `migrations/` directory.
///
/// This function executes all SQL migration files in order. Migrations are
/// tracked in a special `_sqlx_migrations` table, so each migration runs
/// only once.
///
/// # Arguments
///
/// * `pool` - Database connection pool
///
/// # Migration Files
///
/// Migration files must be in `migrations/` directory with format:
/// - `<timestamp>_<name>.sql` (e.g., `20250101000001_create_api_keys.sql`)
///
/// # Errors
///
/// Returns an error if:
/// - Migration files cannot be read
/// - SQL syntax errors in migration files
/// - Database errors during migration execution
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}
