use sqlx::PgPool;

use crate::models::SiteCounts;

pub async fn site_counts(pool: &PgPool) -> Result<SiteCounts, sqlx::Error> {
    sqlx::query_as::<_, SiteCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM sermons) AS sermons,
            (SELECT COUNT(*) FROM photos) AS photos,
            (SELECT COUNT(*) FROM events) AS events,
            (SELECT COUNT(*) FROM members) AS members,
            (SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM contributions) AS total_cents
        "#,
    )
    .fetch_one(pool)
    .await
}
