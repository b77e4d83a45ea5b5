use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A temporary restriction (e.g. a mute) on a user within a server.
///
/// At most one is active per (server, user) pair; re-applying replaces the
/// previous one. `expires_at` of `None` means indefinite until lifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Restriction {
    pub server_id: String,
    pub target_user_id: String,
    pub applied_by: String,
    pub reason: String,
    pub applied_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Restriction {
    /// Whether the restriction is still in force at the given instant.
    /// Expiry is exclusive: a restriction expiring exactly at `at` is over.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > at,
            None => true,
        }
    }
}
