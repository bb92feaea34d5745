use shared::models::{Project, ProjectCreate, ProjectUpdate};
use sqlx::PgPool;

pub async fn list(pool: &PgPool, only_active: bool) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM projects WHERE (NOT $1 OR active)
         ORDER BY display_order, id",
    )
    .bind(only_active)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    data: &ProjectCreate,
    display_order: i32,
    now: i64,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO projects (title, description, partner, image_url, link_url, active, display_order, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.partner)
    .bind(&data.image_url)
    .bind(&data.link_url)
    .bind(data.active)
    .bind(display_order)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ProjectUpdate,
    now: i64,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE projects SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            partner = COALESCE($3, partner),
            image_url = COALESCE($4, image_url),
            link_url = COALESCE($5, link_url),
            active = COALESCE($6, active),
            updated_at = $7
         WHERE id = $8
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.partner)
    .bind(&data.image_url)
    .bind(&data.link_url)
    .bind(data.active)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
