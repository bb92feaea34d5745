use shared::models::{Event, EventCreate, EventUpdate};
use sqlx::PgPool;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM events ORDER BY display_order, starts_at")
        .fetch_all(pool)
        .await
}

/// Published events; upcoming ones (from `now`) first, then past ones, most recent first
pub async fn list_published(pool: &PgPool, now: i64) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM events WHERE published
         ORDER BY (COALESCE(ends_at, starts_at) < $1),
                  CASE WHEN COALESCE(ends_at, starts_at) >= $1 THEN starts_at END ASC,
                  starts_at DESC",
    )
    .bind(now)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    data: &EventCreate,
    display_order: i32,
    now: i64,
) -> Result<Event, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO events (title, description, location, starts_at, ends_at, image_url, published, display_order, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.location)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(&data.image_url)
    .bind(data.published)
    .bind(display_order)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &EventUpdate,
    now: i64,
) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE events SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            location = COALESCE($3, location),
            starts_at = COALESCE($4, starts_at),
            ends_at = COALESCE($5, ends_at),
            image_url = COALESCE($6, image_url),
            published = COALESCE($7, published),
            updated_at = $8
         WHERE id = $9
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.location)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(&data.image_url)
    .bind(data.published)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
