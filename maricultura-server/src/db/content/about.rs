use shared::models::{AboutSection, AboutSectionCreate, AboutSectionUpdate};
use sqlx::PgPool;

pub async fn list(pool: &PgPool) -> Result<Vec<AboutSection>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM about_sections ORDER BY display_order, id")
        .fetch_all(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    data: &AboutSectionCreate,
    display_order: i32,
    now: i64,
) -> Result<AboutSection, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO about_sections (section_key, title, content, image_url, display_order, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(&data.section_key)
    .bind(&data.title)
    .bind(&data.content)
    .bind(&data.image_url)
    .bind(display_order)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &AboutSectionUpdate,
    now: i64,
) -> Result<Option<AboutSection>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE about_sections SET
            title = COALESCE($1, title),
            content = COALESCE($2, content),
            image_url = COALESCE($3, image_url),
            updated_at = $4
         WHERE id = $5
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.content)
    .bind(&data.image_url)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM about_sections WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
