use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ForumComment, ForumCommentCreate, ForumPost, ForumPostCreate};

const POST_COLUMNS: &str = r#"
    p.id, p.author_id, p.author_name, p.title, p.content, p.created_at,
    (SELECT COUNT(*) FROM forum_likes l WHERE l.post_id = p.id) AS likes,
    (SELECT COUNT(*) FROM forum_comments c WHERE c.post_id = p.id) AS comments
"#;

pub async fn create_post(pool: &PgPool, data: &ForumPostCreate) -> Result<ForumPost, sqlx::Error> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO forum_posts (author_id, author_name, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(data.author_id)
    .bind(&data.author_name)
    .bind(&data.title)
    .bind(&data.content)
    .fetch_one(pool)
    .await?;

    get_post(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn list_posts(pool: &PgPool, limit: Option<i64>) -> Result<Vec<ForumPost>, sqlx::Error> {
    sqlx::query_as::<_, ForumPost>(&format!(
        "SELECT {POST_COLUMNS} FROM forum_posts p ORDER BY p.created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_post(pool: &PgPool, id: Uuid) -> Result<Option<ForumPost>, sqlx::Error> {
    sqlx::query_as::<_, ForumPost>(&format!(
        "SELECT {POST_COLUMNS} FROM forum_posts p WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM forum_posts WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn add_comment(
    pool: &PgPool,
    data: &ForumCommentCreate,
) -> Result<ForumComment, sqlx::Error> {
    sqlx::query_as::<_, ForumComment>(
        r#"
        INSERT INTO forum_comments (post_id, author_id, author_name, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(data.post_id)
    .bind(data.author_id)
    .bind(&data.author_name)
    .bind(&data.content)
    .fetch_one(pool)
    .await
}

pub async fn list_comments(pool: &PgPool, post_id: Uuid) -> Result<Vec<ForumComment>, sqlx::Error> {
    sqlx::query_as::<_, ForumComment>(
        r#"
        SELECT *
        FROM forum_comments
        WHERE post_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

/// Likes a post once per user. Returns `false` when the like already existed.
pub async fn like_post(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO forum_likes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
