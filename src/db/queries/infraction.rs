use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::Infraction;

/// Insert a new infraction, allocating the next id for the server.
///
/// The counter row is bumped and the infraction inserted in one transaction,
/// so an id is never burned without its record and never handed out twice.
/// Counters only grow; clearing a user's warnings does not wind them back.
pub async fn create(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
    moderator_user_id: &str,
    reason: &str,
    created_at: DateTime<Utc>,
) -> Result<Infraction, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO infraction_counters (server_id, last_id)
        VALUES (?1, 1)
        ON CONFLICT(server_id) DO UPDATE SET last_id = last_id + 1
        RETURNING last_id
        "#,
    )
    .bind(server_id)
    .fetch_one(&mut *tx)
    .await?;

    let infraction = sqlx::query_as::<_, Infraction>(
        r#"
        INSERT INTO infractions (id, server_id, target_user_id, moderator_user_id, reason, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(server_id)
    .bind(target_user_id)
    .bind(moderator_user_id)
    .bind(reason)
    .bind(created_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(infraction)
}

pub async fn list_for_user(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
) -> Result<Vec<Infraction>, sqlx::Error> {
    sqlx::query_as::<_, Infraction>(
        r#"
        SELECT * FROM infractions
        WHERE server_id = ?1 AND target_user_id = ?2
        ORDER BY id ASC
        "#,
    )
    .bind(server_id)
    .bind(target_user_id)
    .fetch_all(pool)
    .await
}

/// Delete all infractions for a user in a server; returns the number removed.
pub async fn clear_for_user(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM infractions
        WHERE server_id = ?1 AND target_user_id = ?2
        "#,
    )
    .bind(server_id)
    .bind(target_user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn count_for_user(
    pool: &SqlitePool,
    server_id: &str,
    target_user_id: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM infractions WHERE server_id = ?1 AND target_user_id = ?2",
    )
    .bind(server_id)
    .bind(target_user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn count_issued_by(
    pool: &SqlitePool,
    server_id: &str,
    moderator_user_id: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM infractions WHERE server_id = ?1 AND moderator_user_id = ?2",
    )
    .bind(server_id)
    .bind(moderator_user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
