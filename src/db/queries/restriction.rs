use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::Restriction;

/// Apply a restriction, replacing any existing one for the pair.
///
/// The (server_id, target_user_id) primary key plus the upsert gives the
/// at-most-one-active invariant; the previous row's state is discarded.
pub async fn upsert(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
    applied_by: &str,
    reason: &str,
    applied_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<Restriction, sqlx::Error> {
    sqlx::query_as::<_, Restriction>(
        r#"
        INSERT INTO restrictions (server_id, target_user_id, applied_by, reason, applied_at, expires_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(server_id, target_user_id) DO UPDATE SET
            applied_by = excluded.applied_by,
            reason = excluded.reason,
            applied_at = excluded.applied_at,
            expires_at = excluded.expires_at
        RETURNING *
        "#,
    )
    .bind(server_id)
    .bind(target_user_id)
    .bind(applied_by)
    .bind(reason)
    .bind(applied_at)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Fetch the stored restriction for a pair, if any. Expiry is not evaluated
/// here; callers check `is_active_at` against their own instant.
pub async fn get(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
) -> Result<Option<Restriction>, sqlx::Error> {
    sqlx::query_as::<_, Restriction>(
        r#"
        SELECT * FROM restrictions
        WHERE server_id = ?1 AND target_user_id = ?2
        "#,
    )
    .bind(server_id)
    .bind(target_user_id)
    .fetch_optional(pool)
    .await
}

/// Remove the restriction for a pair; returns whether one existed.
pub async fn delete(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM restrictions
        WHERE server_id = ?1 AND target_user_id = ?2
        "#,
    )
    .bind(server_id)
    .bind(target_user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_for_server(
    pool: &SqlitePool,
    server_id: &str,
) -> Result<Vec<Restriction>, sqlx::Error> {
    sqlx::query_as::<_, Restriction>(
        r#"
        SELECT * FROM restrictions
        WHERE server_id = ?1
        ORDER BY applied_at DESC
        "#,
    )
    .bind(server_id)
    .fetch_all(pool)
    .await
}

/// Delete restrictions whose expiry has passed; returns the number removed.
/// Indefinite restrictions (NULL expiry) are never swept.
pub async fn delete_expired(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM restrictions
        WHERE expires_at IS NOT NULL AND expires_at <= ?1
        "#,
    )
    .bind(cutoff)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
