use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::db::models::{Infraction, Restriction, ServerConfig};
use crate::db::queries::{infraction, restriction, server_config};
use crate::error::Error;

const MAX_COMMAND_PREFIX_LEN: usize = 8;

/// The moderation ledger: warnings, temporary restrictions, and per-server
/// configuration, scoped by opaque (server, user) identifiers.
///
/// All record mutation goes through this type. Mutations for the same server
/// are serialized through a per-server lock, so concurrent `record_warning`
/// calls always get distinct consecutive ids; operations on different servers
/// do not contend.
pub struct Ledger {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    /// server_id -> write lock for that server's records
    server_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Ledger {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            clock,
            server_locks: DashMap::new(),
        }
    }

    /// Record a warning against a user; allocates the server's next id.
    ///
    /// The record is persisted before this returns. Callers wanting
    /// escalate-after-N policies inspect `warning_count` afterwards; the
    /// ledger itself imposes no cap.
    pub async fn record_warning(
        &self,
        server_id: &str,
        target_user_id: &str,
        moderator_user_id: &str,
        reason: Option<&str>,
    ) -> Result<Infraction, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;
        validate_id("moderator_user_id", moderator_user_id)?;

        let lock = self.server_lock(server_id);
        let _guard = lock.lock().await;

        let created = infraction::create(
            &self.pool,
            server_id,
            target_user_id,
            moderator_user_id,
            reason.unwrap_or(""),
            self.clock.now(),
        )
        .await?;

        info!(
            "Moderator {} warned user {} in server {} (infraction #{})",
            moderator_user_id, target_user_id, server_id, created.id
        );

        Ok(created)
    }

    /// All warnings for a user in a server, oldest first. Empty when none.
    pub async fn list_warnings(
        &self,
        server_id: &str,
        target_user_id: &str,
    ) -> Result<Vec<Infraction>, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;

        Ok(infraction::list_for_user(&self.pool, server_id, target_user_id).await?)
    }

    /// Remove all of a user's warnings in one step; returns how many were
    /// removed (0 when there were none). Infraction ids are not reused
    /// afterwards — the server's sequence keeps counting.
    pub async fn clear_warnings(
        &self,
        server_id: &str,
        target_user_id: &str,
    ) -> Result<u64, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;

        let lock = self.server_lock(server_id);
        let _guard = lock.lock().await;

        let removed = infraction::clear_for_user(&self.pool, server_id, target_user_id).await?;

        info!(
            "Cleared {} warning(s) for user {} in server {}",
            removed, target_user_id, server_id
        );

        Ok(removed)
    }

    pub async fn warning_count(
        &self,
        server_id: &str,
        target_user_id: &str,
    ) -> Result<i64, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;

        Ok(infraction::count_for_user(&self.pool, server_id, target_user_id).await?)
    }

    pub async fn warnings_issued_by(
        &self,
        server_id: &str,
        moderator_user_id: &str,
    ) -> Result<i64, Error> {
        validate_id("server_id", server_id)?;
        validate_id("moderator_user_id", moderator_user_id)?;

        Ok(infraction::count_issued_by(&self.pool, server_id, moderator_user_id).await?)
    }

    /// Restrict (e.g. mute) a user. `duration` of `None` means indefinite;
    /// otherwise it must be positive and sets `expires_at = now + duration`.
    /// Re-applying while a restriction is active replaces it outright.
    pub async fn apply_restriction(
        &self,
        server_id: &str,
        target_user_id: &str,
        applied_by: &str,
        reason: Option<&str>,
        duration: Option<Duration>,
    ) -> Result<Restriction, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;
        validate_id("applied_by", applied_by)?;

        if let Some(duration) = duration {
            if duration <= Duration::zero() {
                return Err(Error::invalid_argument("duration must be positive"));
            }
        }

        let lock = self.server_lock(server_id);
        let _guard = lock.lock().await;

        let applied_at = self.clock.now();
        let expires_at = duration.map(|d| applied_at + d);

        let applied = restriction::upsert(
            &self.pool,
            server_id,
            target_user_id,
            applied_by,
            reason.unwrap_or(""),
            applied_at,
            expires_at,
        )
        .await?;

        info!(
            "Moderator {} restricted user {} in server {} (expires: {:?})",
            applied_by, target_user_id, server_id, applied.expires_at
        );

        Ok(applied)
    }

    /// Lift the active restriction, if any; returns whether one was removed.
    /// Lifting a user who is not restricted is a no-op, not an error.
    pub async fn lift_restriction(
        &self,
        server_id: &str,
        target_user_id: &str,
    ) -> Result<bool, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;

        let lock = self.server_lock(server_id);
        let _guard = lock.lock().await;

        let lifted = restriction::delete(&self.pool, server_id, target_user_id).await?;

        if lifted {
            info!(
                "Restriction lifted for user {} in server {}",
                target_user_id, server_id
            );
        } else {
            debug!(
                "No active restriction for user {} in server {}",
                target_user_id, server_id
            );
        }

        Ok(lifted)
    }

    /// Whether the user is restricted at the given instant. Pure query:
    /// expiry is evaluated lazily here, never by a background task.
    pub async fn is_restricted(
        &self,
        server_id: &str,
        target_user_id: &str,
        at_time: DateTime<Utc>,
    ) -> Result<bool, Error> {
        Ok(self
            .active_restriction_at(server_id, target_user_id, at_time)
            .await?
            .is_some())
    }

    /// The restriction currently in force for the pair, if any, judged
    /// against the ledger clock.
    pub async fn active_restriction(
        &self,
        server_id: &str,
        target_user_id: &str,
    ) -> Result<Option<Restriction>, Error> {
        let now = self.clock.now();
        self.active_restriction_at(server_id, target_user_id, now)
            .await
    }

    async fn active_restriction_at(
        &self,
        server_id: &str,
        target_user_id: &str,
        at_time: DateTime<Utc>,
    ) -> Result<Option<Restriction>, Error> {
        validate_id("server_id", server_id)?;
        validate_id("target_user_id", target_user_id)?;

        let stored = restriction::get(&self.pool, server_id, target_user_id).await?;

        Ok(stored.filter(|r| r.is_active_at(at_time)))
    }

    /// All restrictions still in force in a server, most recent first.
    pub async fn active_restrictions(
        &self,
        server_id: &str,
    ) -> Result<Vec<Restriction>, Error> {
        validate_id("server_id", server_id)?;

        let now = self.clock.now();
        let stored = restriction::list_for_server(&self.pool, server_id).await?;

        Ok(stored.into_iter().filter(|r| r.is_active_at(now)).collect())
    }

    /// Delete restrictions whose expiry has passed; returns how many were
    /// removed. Callers that need eager enforcement (e.g. removing a platform
    /// mute role) invoke this periodically; the ledger schedules nothing.
    pub async fn sweep_expired(&self) -> Result<u64, Error> {
        let removed = restriction::delete_expired(&self.pool, self.clock.now()).await?;

        if removed > 0 {
            info!("Swept {} expired restriction(s)", removed);
        }

        Ok(removed)
    }

    /// The server's configuration, created with defaults on first access.
    pub async fn server_config(&self, server_id: &str) -> Result<ServerConfig, Error> {
        validate_id("server_id", server_id)?;

        Ok(server_config::get_or_create(&self.pool, server_id, self.clock.now()).await?)
    }

    pub async fn set_command_prefix(
        &self,
        server_id: &str,
        prefix: &str,
    ) -> Result<ServerConfig, Error> {
        validate_id("server_id", server_id)?;

        if prefix.is_empty() || prefix.len() > MAX_COMMAND_PREFIX_LEN {
            return Err(Error::invalid_argument(format!(
                "command prefix must be 1-{MAX_COMMAND_PREFIX_LEN} characters"
            )));
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(Error::invalid_argument(
                "command prefix must not contain whitespace",
            ));
        }

        let config =
            server_config::set_command_prefix(&self.pool, server_id, prefix, self.clock.now())
                .await?;

        info!("Command prefix for server {} set to {:?}", server_id, prefix);

        Ok(config)
    }

    pub async fn set_log_channel(
        &self,
        server_id: &str,
        channel_id: Option<&str>,
    ) -> Result<ServerConfig, Error> {
        validate_id("server_id", server_id)?;
        if let Some(channel_id) = channel_id {
            validate_id("channel_id", channel_id)?;
        }

        let config =
            server_config::set_log_channel(&self.pool, server_id, channel_id, self.clock.now())
                .await?;

        info!(
            "Log channel for server {} set to {:?}",
            server_id, config.log_channel_id
        );

        Ok(config)
    }

    fn server_lock(&self, server_id: &str) -> Arc<Mutex<()>> {
        self.server_locks
            .entry(server_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Identifiers are opaque platform strings; reject only what can never be
/// one: empty strings and whitespace/control characters.
fn validate_id(field: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{field} must not be empty")));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::invalid_argument(format!(
            "{field} must not contain whitespace or control characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(validate_id("server_id", "123456789012345678").is_ok());
        assert!(validate_id("server_id", "guild-a").is_ok());
        assert!(validate_id("target_user_id", "u1").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_malformed_ids() {
        assert!(validate_id("server_id", "").is_err());
        assert!(validate_id("server_id", " ").is_err());
        assert!(validate_id("server_id", "a b").is_err());
        assert!(validate_id("server_id", "a\tb").is_err());
        assert!(validate_id("server_id", "a\nb").is_err());
    }
}
