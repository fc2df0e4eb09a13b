use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, EventCreate};

pub async fn create_event(pool: &PgPool, data: &EventCreate) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (title, description, date, start_time, end_time, location, event_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(&data.location)
    .bind(data.event_type.as_str())
    .fetch_one(pool)
    .await
}

pub async fn list_events(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(r#"SELECT * FROM events ORDER BY date ASC, start_time ASC"#)
        .fetch_all(pool)
        .await
}

pub async fn upcoming_events(
    pool: &PgPool,
    from: NaiveDate,
    limit: i64,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT *
        FROM events
        WHERE date >= $1
        ORDER BY date ASC, start_time ASC
        LIMIT $2
        "#,
    )
    .bind(from)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    data: &EventCreate,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET
            title = $1,
            description = $2,
            date = $3,
            start_time = $4,
            end_time = $5,
            location = $6,
            event_type = $7
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(&data.location)
    .bind(data.event_type.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
