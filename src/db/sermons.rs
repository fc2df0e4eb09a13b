use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Sermon, SermonCreate, SermonUpdate};

pub async fn create_sermon(pool: &PgPool, data: &SermonCreate) -> Result<Sermon, sqlx::Error> {
    sqlx::query_as::<_, Sermon>(
        r#"
        INSERT INTO sermons (title, description, date, image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.date)
    .bind(data.image_url.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn list_sermons(pool: &PgPool, limit: Option<i64>) -> Result<Vec<Sermon>, sqlx::Error> {
    sqlx::query_as::<_, Sermon>(
        r#"
        SELECT *
        FROM sermons
        ORDER BY date DESC, created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_sermon(pool: &PgPool, id: Uuid) -> Result<Option<Sermon>, sqlx::Error> {
    sqlx::query_as::<_, Sermon>(r#"SELECT * FROM sermons WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_sermon(
    pool: &PgPool,
    id: Uuid,
    data: &SermonUpdate,
) -> Result<Option<Sermon>, sqlx::Error> {
    sqlx::query_as::<_, Sermon>(
        r#"
        UPDATE sermons
        SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            date = COALESCE($3, date)
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(data.title.as_deref())
    .bind(data.description.as_deref())
    .bind(data.date)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Deletes the row and hands it back so the caller can drop its image.
pub async fn delete_sermon(pool: &PgPool, id: Uuid) -> Result<Option<Sermon>, sqlx::Error> {
    sqlx::query_as::<_, Sermon>(r#"DELETE FROM sermons WHERE id = $1 RETURNING *"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}
