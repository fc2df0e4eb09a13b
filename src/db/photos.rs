use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Photo, PhotoCreate};

pub async fn create_photo(pool: &PgPool, data: &PhotoCreate) -> Result<Photo, sqlx::Error> {
    sqlx::query_as::<_, Photo>(
        r#"
        INSERT INTO photos (title, image_url)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.image_url)
    .fetch_one(pool)
    .await
}

pub async fn list_photos(pool: &PgPool) -> Result<Vec<Photo>, sqlx::Error> {
    sqlx::query_as::<_, Photo>(r#"SELECT * FROM photos ORDER BY created_at DESC"#)
        .fetch_all(pool)
        .await
}

pub async fn delete_photo(pool: &PgPool, id: Uuid) -> Result<Option<Photo>, sqlx::Error> {
    sqlx::query_as::<_, Photo>(r#"DELETE FROM photos WHERE id = $1 RETURNING *"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}
