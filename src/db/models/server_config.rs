use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Per-server bot configuration.
///
/// One row per server, created on first access. Prefix and log channel are
/// scoped to the server rather than being process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServerConfig {
    pub server_id: String,
    pub command_prefix: String,
    pub log_channel_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServerConfig {
    pub fn has_log_channel(&self) -> bool {
        self.log_channel_id.is_some()
    }
}
