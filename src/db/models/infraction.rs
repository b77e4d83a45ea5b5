use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable recorded warning against a user within a server.
///
/// Ids are allocated sequentially per server starting at 1 and are never
/// reused, even after the user's warnings are cleared, so references to an
/// infraction in external audit logs stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Infraction {
    pub id: i64,
    pub server_id: String,
    pub target_user_id: String,
    pub moderator_user_id: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
