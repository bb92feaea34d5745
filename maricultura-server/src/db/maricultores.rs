//! Maricultor (member) database operations

use shared::models::{LedgerMember, Maricultor, MaricultorCreate, MaricultorUpdate, ProducerPin};
use sqlx::{PgExecutor, PgPool};

pub async fn list(pool: &PgPool, active: Option<bool>) -> Result<Vec<Maricultor>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM maricultores
         WHERE ($1::boolean IS NULL OR is_active = $1)
         ORDER BY name",
    )
    .bind(active)
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Maricultor>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM maricultores WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_user(pool: &PgPool, user_id: i64) -> Result<Option<Maricultor>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM maricultores WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Insert a member; `data.phone` must already be normalized
pub async fn create(
    executor: impl PgExecutor<'_>,
    data: &MaricultorCreate,
    user_id: Option<i64>,
    now: i64,
) -> Result<Maricultor, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO maricultores (
            user_id, name, phone, email, city, community, species, latitude, longitude,
            monthly_fee_amount, association_date, fee_exempt, is_active, show_on_map,
            created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, TRUE, $13, $14, $14)
         RETURNING *",
    )
    .bind(user_id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.city)
    .bind(&data.community)
    .bind(&data.species)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(data.monthly_fee_amount)
    .bind(data.association_date)
    .bind(data.fee_exempt)
    .bind(data.show_on_map)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    data: &MaricultorUpdate,
    now: i64,
) -> Result<Option<Maricultor>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE maricultores SET
            name = COALESCE($1, name),
            phone = COALESCE($2, phone),
            email = COALESCE($3, email),
            city = COALESCE($4, city),
            community = COALESCE($5, community),
            species = COALESCE($6, species),
            latitude = COALESCE($7, latitude),
            longitude = COALESCE($8, longitude),
            monthly_fee_amount = COALESCE($9, monthly_fee_amount),
            association_date = COALESCE($10, association_date),
            fee_exempt = COALESCE($11, fee_exempt),
            is_active = COALESCE($12, is_active),
            show_on_map = COALESCE($13, show_on_map),
            updated_at = $14
         WHERE id = $15
         RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.city)
    .bind(&data.community)
    .bind(&data.species)
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(data.monthly_fee_amount)
    .bind(data.association_date)
    .bind(data.fee_exempt)
    .bind(data.is_active)
    .bind(data.show_on_map)
    .bind(now)
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Soft delete: members are never removed
pub async fn deactivate(pool: &PgPool, id: i64, now: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE maricultores SET is_active = FALSE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn link_user(
    executor: impl PgExecutor<'_>,
    id: i64,
    user_id: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE maricultores SET user_id = $1, updated_at = $2 WHERE id = $3")
        .bind(user_id)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Active members as the year grid sees them
pub async fn ledger_members(pool: &PgPool) -> Result<Vec<LedgerMember>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, monthly_fee_amount, association_date, fee_exempt
         FROM maricultores
         WHERE is_active
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM maricultores WHERE is_active")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Pins for the public producers map
pub async fn producer_pins(pool: &PgPool) -> Result<Vec<ProducerPin>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, city, community, species, latitude, longitude
         FROM maricultores
         WHERE is_active AND show_on_map
           AND latitude IS NOT NULL AND longitude IS NOT NULL
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Login ids of active, non-exempt members with no record for (year, month)
pub async fn users_missing_payment(
    pool: &PgPool,
    year: i32,
    month: i32,
) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT m.user_id
         FROM maricultores m
         WHERE m.is_active AND NOT m.fee_exempt AND m.user_id IS NOT NULL
           AND NOT EXISTS (
               SELECT 1 FROM monthly_payments p
               WHERE p.maricultor_id = m.id AND p.year = $1 AND p.month = $2
           )",
    )
    .bind(year)
    .bind(month)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
