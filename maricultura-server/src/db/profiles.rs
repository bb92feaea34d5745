//! Login accounts (admins and members)

use shared::models::{Profile, ProfileUpdate};
use sqlx::{PgExecutor, PgPool};

/// Profile plus its password hash, only used at the auth boundary
#[derive(sqlx::FromRow)]
pub struct ProfileLogin {
    #[sqlx(flatten)]
    pub profile: Profile,
    pub hashed_password: String,
}

pub struct NewProfile<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub hashed_password: &'a str,
    pub role: &'a str,
}

pub async fn create(
    executor: impl PgExecutor<'_>,
    new: &NewProfile<'_>,
    now: i64,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO profiles (name, email, phone, hashed_password, role, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
         RETURNING *",
    )
    .bind(new.name)
    .bind(new.email)
    .bind(new.phone)
    .bind(new.hashed_password)
    .bind(new.role)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_login_by_id(pool: &PgPool, id: i64) -> Result<Option<ProfileLogin>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_login_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<ProfileLogin>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_login_by_phone(
    pool: &PgPool,
    phone: &str,
) -> Result<Option<ProfileLogin>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE phone = $1")
        .bind(phone)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool, role: Option<&str>) -> Result<Vec<Profile>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM profiles
         WHERE ($1::text IS NULL OR role = $1)
         ORDER BY name",
    )
    .bind(role)
    .fetch_all(pool)
    .await
}

/// Partial update; `data.phone`/`data.email` must already be normalized
pub async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    data: &ProfileUpdate,
    now: i64,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE profiles SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            phone = COALESCE($3, phone),
            role = COALESCE($4, role),
            is_active = COALESCE($5, is_active),
            updated_at = $6
         WHERE id = $7
         RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(data.role.map(|r| r.as_str()))
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn update_password(
    pool: &PgPool,
    id: i64,
    hashed_password: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE profiles SET hashed_password = $1, updated_at = $2 WHERE id = $3")
            .bind(hashed_password)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_active_admins(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE role = 'admin' AND is_active")
            .fetch_one(pool)
            .await?;
    Ok(count)
}
