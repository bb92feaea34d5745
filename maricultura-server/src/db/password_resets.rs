//! Password reset codes (hashed, one pending code per address)

use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct PasswordReset {
    pub email: String,
    pub code_hash: String,
    pub attempts: i32,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Store a fresh code, replacing any pending one and resetting attempts
pub async fn upsert(
    pool: &PgPool,
    email: &str,
    code_hash: &str,
    expires_at: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO password_resets (email, code_hash, attempts, expires_at, created_at)
         VALUES ($1, $2, 0, $3, $4)
         ON CONFLICT (email) DO UPDATE SET
            code_hash = $2, attempts = 0, expires_at = $3, created_at = $4",
    )
    .bind(email)
    .bind(code_hash)
    .bind(expires_at)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find(pool: &PgPool, email: &str) -> Result<Option<PasswordReset>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM password_resets WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn increment_attempts(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE password_resets SET attempts = attempts + 1 WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM password_resets WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop expired codes
pub async fn purge_expired(pool: &PgPool, now: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM password_resets WHERE expires_at < $1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
