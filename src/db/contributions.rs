use sqlx::PgPool;

use crate::models::ContributionRow;

/// All contributions joined with their member, oldest first.
pub async fn list_contribution_rows(pool: &PgPool) -> Result<Vec<ContributionRow>, sqlx::Error> {
    sqlx::query_as::<_, ContributionRow>(
        r#"
        SELECT
            c.id, c.member_id, m.name AS member_name, m.email AS member_email,
            c.amount_cents, c.date, c.week, c.description
        FROM contributions c
        JOIN members m ON m.id = c.member_id
        ORDER BY c.date ASC, m.name ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// A page of contributions, newest first.
pub async fn recent_contribution_rows(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<ContributionRow>, sqlx::Error> {
    sqlx::query_as::<_, ContributionRow>(
        r#"
        SELECT
            c.id, c.member_id, m.name AS member_name, m.email AS member_email,
            c.amount_cents, c.date, c.week, c.description
        FROM contributions c
        JOIN members m ON m.id = c.member_id
        ORDER BY c.date DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
