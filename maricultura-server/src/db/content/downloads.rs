use shared::models::{Download, DownloadCreate, DownloadUpdate};
use sqlx::PgPool;

pub async fn list(pool: &PgPool, only_active: bool) -> Result<Vec<Download>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM downloads WHERE (NOT $1 OR active)
         ORDER BY display_order, id",
    )
    .bind(only_active)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    data: &DownloadCreate,
    display_order: i32,
    now: i64,
) -> Result<Download, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO downloads (title, description, file_url, category, active, display_order, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.file_url)
    .bind(&data.category)
    .bind(data.active)
    .bind(display_order)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &DownloadUpdate,
    now: i64,
) -> Result<Option<Download>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE downloads SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            file_url = COALESCE($3, file_url),
            category = COALESCE($4, category),
            active = COALESCE($5, active),
            updated_at = $6
         WHERE id = $7
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.file_url)
    .bind(&data.category)
    .bind(data.active)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM downloads WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
