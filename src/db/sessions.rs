use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Session;

pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl: Duration,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (token, user_id, expires_at)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(Utc::now() + ttl)
    .fetch_one(pool)
    .await
}

/// Returns the session only while it has not expired.
pub async fn get_active_session(pool: &PgPool, token: Uuid) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT *
        FROM sessions
        WHERE token = $1 AND expires_at > now()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &PgPool, token: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM sessions WHERE token = $1"#)
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM sessions WHERE expires_at <= now()"#)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
