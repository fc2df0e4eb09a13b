use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Member, MemberWithTotal};

/// Every member with the sum of their contributions, alphabetically.
pub async fn list_members_with_totals(pool: &PgPool) -> Result<Vec<MemberWithTotal>, sqlx::Error> {
    sqlx::query_as::<_, MemberWithTotal>(
        r#"
        SELECT
            m.id,
            m.name,
            m.email,
            m.created_at,
            COALESCE(SUM(c.amount_cents), 0)::BIGINT AS total_cents
        FROM members m
        LEFT JOIN contributions c ON c.member_id = m.id
        GROUP BY m.id, m.name, m.email, m.created_at
        ORDER BY m.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_member(pool: &PgPool, id: Uuid) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(r#"SELECT * FROM members WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Deletes the member and, through the foreign key, their contributions.
pub async fn delete_member(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM members WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
