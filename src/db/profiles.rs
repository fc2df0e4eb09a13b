use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;

pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(r#"SELECT * FROM profiles WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_profiles(pool: &PgPool) -> Result<Vec<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(r#"SELECT * FROM profiles ORDER BY name ASC"#)
        .fetch_all(pool)
        .await
}

pub async fn set_profile_admin(
    pool: &PgPool,
    id: Uuid,
    is_admin: bool,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET is_admin = $1
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(is_admin)
    .bind(id)
    .fetch_optional(pool)
    .await
}
