use shared::models::{News, NewsCreate, NewsUpdate};
use sqlx::PgPool;

pub async fn list_all(pool: &PgPool) -> Result<Vec<News>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM news ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Published articles, newest first
pub async fn list_published(pool: &PgPool, limit: i64) -> Result<Vec<News>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM news WHERE published
         ORDER BY published_at DESC NULLS LAST, id DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<News>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM news WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_published_by_slug(pool: &PgPool, slug: &str) -> Result<Option<News>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM news WHERE slug = $1 AND published")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    data: &NewsCreate,
    slug: &str,
    now: i64,
) -> Result<News, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO news (title, slug, summary, content, image_url, published, published_at, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $6 THEN $7 END, $7, $7)
         RETURNING *",
    )
    .bind(&data.title)
    .bind(slug)
    .bind(&data.summary)
    .bind(&data.content)
    .bind(&data.image_url)
    .bind(data.published)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update; `published_at` is stamped the first time the article goes live
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &NewsUpdate,
    now: i64,
) -> Result<Option<News>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE news SET
            title = COALESCE($1, title),
            slug = COALESCE($2, slug),
            summary = COALESCE($3, summary),
            content = COALESCE($4, content),
            image_url = COALESCE($5, image_url),
            published = COALESCE($6, published),
            published_at = CASE
                WHEN COALESCE($6, published) AND published_at IS NULL THEN $7
                ELSE published_at
            END,
            updated_at = $7
         WHERE id = $8
         RETURNING *",
    )
    .bind(&data.title)
    .bind(&data.slug)
    .bind(&data.summary)
    .bind(&data.content)
    .bind(&data.image_url)
    .bind(data.published)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_published(
    pool: &PgPool,
    id: i64,
    published: bool,
    now: i64,
) -> Result<Option<News>, sqlx::Error> {
    let data = NewsUpdate {
        published: Some(published),
        ..Default::default()
    };
    update(pool, id, &data, now).await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
