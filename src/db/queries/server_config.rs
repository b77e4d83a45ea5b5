use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::{ServerConfig, DEFAULT_COMMAND_PREFIX};

pub async fn get(
    pool: &SqlitePool,
    server_id: &str,
) -> Result<Option<ServerConfig>, sqlx::Error> {
    sqlx::query_as::<_, ServerConfig>("SELECT * FROM server_configs WHERE server_id = ?1")
        .bind(server_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_or_create(
    pool: &SqlitePool,
    server_id: &str,
    now: DateTime<Utc>,
) -> Result<ServerConfig, sqlx::Error> {
    // Try to get existing config
    if let Some(config) = get(pool, server_id).await? {
        return Ok(config);
    }

    // Create new config with defaults
    sqlx::query_as::<_, ServerConfig>(
        r#"
        INSERT INTO server_configs (server_id, command_prefix, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)
        ON CONFLICT(server_id) DO UPDATE SET server_id = server_id
        RETURNING *
        "#,
    )
    .bind(server_id)
    .bind(DEFAULT_COMMAND_PREFIX)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn set_command_prefix(
    pool: &SqlitePool,
    server_id: &str,
    prefix: &str,
    now: DateTime<Utc>,
) -> Result<ServerConfig, sqlx::Error> {
    // Ensure config exists
    get_or_create(pool, server_id, now).await?;

    sqlx::query_as::<_, ServerConfig>(
        r#"
        UPDATE server_configs
        SET command_prefix = ?2, updated_at = ?3
        WHERE server_id = ?1
        RETURNING *
        "#,
    )
    .bind(server_id)
    .bind(prefix)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn set_log_channel(
    pool: &SqlitePool,
    server_id: &str,
    channel_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ServerConfig, sqlx::Error> {
    // Ensure config exists
    get_or_create(pool, server_id, now).await?;

    sqlx::query_as::<_, ServerConfig>(
        r#"
        UPDATE server_configs
        SET log_channel_id = ?2, updated_at = ?3
        WHERE server_id = ?1
        RETURNING *
        "#,
    )
    .bind(server_id)
    .bind(channel_id)
    .bind(now)
    .fetch_one(pool)
    .await
}
