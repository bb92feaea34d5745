//! Browser push subscriptions

use shared::models::PushSubscription;
use sqlx::PgPool;

/// Store a subscription; re-subscribing the same endpoint refreshes keys and owner
pub async fn upsert(
    pool: &PgPool,
    user_id: i64,
    endpoint: &str,
    p256dh: &str,
    auth: &str,
    now: i64,
) -> Result<PushSubscription, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth, created_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (endpoint) DO UPDATE SET
            user_id = EXCLUDED.user_id, p256dh = EXCLUDED.p256dh, auth = EXCLUDED.auth
         RETURNING *",
    )
    .bind(user_id)
    .bind(endpoint)
    .bind(p256dh)
    .bind(auth)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn delete_by_endpoint(
    pool: &PgPool,
    user_id: i64,
    endpoint: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1 AND user_id = $2")
        .bind(endpoint)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_many(pool: &PgPool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query("DELETE FROM push_subscriptions WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<PushSubscription>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM push_subscriptions ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn list_for_users(
    pool: &PgPool,
    user_ids: &[i64],
) -> Result<Vec<PushSubscription>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM push_subscriptions WHERE user_id = ANY($1) ORDER BY id")
        .bind(user_ids)
        .fetch_all(pool)
        .await
}
