//! Usage log records.

use uuid::Uuid;

/// A usage row appended after a successful generation call.
///
/// Rows are written best-effort for billing and abuse review; nothing on
/// the request path reads them back, so a failed write never fails the
/// generation response.
#[derive(Debug, Clone)]
pub struct NewUsage {
    /// Key that authenticated the call
    pub api_key_id: Uuid,
    /// Owner of that key, denormalized for per-user teardown and reporting
    pub user_id: String,
    /// Prompt length in characters; the prompt text itself is not stored
    pub prompt_chars: i64,
    pub width: i64,
    pub height: i64,
    /// Client IP as resolved from forwarding headers, or "unknown"
    pub client_ip: String,
}
