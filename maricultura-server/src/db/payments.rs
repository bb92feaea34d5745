//! Monthly payment (mensalidade) database operations

use shared::ledger::{self, ValidatedPayment};
use shared::models::{MonthlyPayment, PaymentUpdate};
use sqlx::{PgExecutor, PgPool};

/// Insert or replace the record for (maricultor, year, month); last writer wins
pub async fn upsert(
    executor: impl PgExecutor<'_>,
    payment: &ValidatedPayment,
    marked_by: i64,
    now: i64,
) -> Result<MonthlyPayment, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO monthly_payments (
            maricultor_id, year, month, amount, payment_method, paid_at, notes, marked_by, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         ON CONFLICT (maricultor_id, year, month)
         DO UPDATE SET
            amount = EXCLUDED.amount,
            payment_method = EXCLUDED.payment_method,
            paid_at = EXCLUDED.paid_at,
            notes = EXCLUDED.notes,
            marked_by = EXCLUDED.marked_by,
            updated_at = EXCLUDED.updated_at
         RETURNING *",
    )
    .bind(payment.maricultor_id)
    .bind(payment.year)
    .bind(payment.month)
    .bind(payment.amount)
    .bind(payment.payment_method)
    .bind(payment.paid_at)
    .bind(&payment.notes)
    .bind(marked_by)
    .bind(now)
    .fetch_one(executor)
    .await
}

/// Partial update; a blank `notes` clears the stored notes and switching to
/// `isento` without a date clears `paid_at`
pub async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    data: &PaymentUpdate,
    marked_by: i64,
    now: i64,
) -> Result<Option<MonthlyPayment>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE monthly_payments SET
            amount = COALESCE($1, amount),
            payment_method = COALESCE($2, payment_method),
            paid_at = CASE WHEN $8 THEN NULL ELSE COALESCE($3, paid_at) END,
            notes = CASE WHEN $4::text IS NULL THEN notes ELSE NULLIF($4, '') END,
            marked_by = $5,
            updated_at = $6
         WHERE id = $7
         RETURNING *",
    )
    .bind(data.amount)
    .bind(data.payment_method)
    .bind(data.paid_at)
    .bind(&data.notes)
    .bind(marked_by)
    .bind(now)
    .bind(id)
    .bind(ledger::update_clears_paid_at(data))
    .fetch_optional(executor)
    .await
}

/// Hard delete, returning the removed row
pub async fn delete(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<MonthlyPayment>, sqlx::Error> {
    sqlx::query_as("DELETE FROM monthly_payments WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_year(
    executor: impl PgExecutor<'_>,
    year: i32,
) -> Result<Vec<MonthlyPayment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM monthly_payments WHERE year = $1 ORDER BY maricultor_id, month")
        .bind(year)
        .fetch_all(executor)
        .await
}

/// Records from (start_year, start_month) onwards
pub async fn list_since(
    pool: &PgPool,
    start_year: i32,
    start_month: i32,
) -> Result<Vec<MonthlyPayment>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM monthly_payments
         WHERE year * 12 + month >= $1 * 12 + $2
         ORDER BY year, month",
    )
    .bind(start_year)
    .bind(start_month)
    .fetch_all(pool)
    .await
}

pub async fn list_for_member(
    pool: &PgPool,
    maricultor_id: i64,
    year: i32,
) -> Result<Vec<MonthlyPayment>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM monthly_payments
         WHERE maricultor_id = $1 AND year = $2
         ORDER BY month",
    )
    .bind(maricultor_id)
    .bind(year)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shared::models::PaymentMethod;
    use sqlx::PgConnection;

    use super::*;
    use crate::db::testing;

    const NOW: i64 = 1_740_000_000_000;

    fn march(maricultor_id: i64, amount: i64, method: PaymentMethod) -> ValidatedPayment {
        ValidatedPayment {
            maricultor_id,
            year: 2025,
            month: 3,
            amount: Some(Decimal::from(amount)),
            payment_method: method,
            paid_at: Some(NOW),
            notes: Some("pago na sede".to_string()),
        }
    }

    async fn rows_for(conn: &mut PgConnection, maricultor_id: i64) -> Vec<MonthlyPayment> {
        list_year(&mut *conn, 2025)
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.maricultor_id == maricultor_id)
            .collect()
    }

    #[tokio::test]
    async fn test_second_record_for_same_month_replaces_first() {
        let Some(pool) = testing::pool().await else {
            return;
        };
        let mut tx = pool.begin().await.unwrap();
        let (admin, member) = testing::seed_member(&mut tx, "upsert").await;

        let first = upsert(&mut *tx, &march(member, 50, PaymentMethod::Pix), admin, NOW)
            .await
            .unwrap();
        let second = upsert(&mut *tx, &march(member, 70, PaymentMethod::Dinheiro), admin, NOW + 1)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let rows = rows_for(&mut tx, member).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Some(Decimal::from(70)));
        assert_eq!(rows[0].payment_method, PaymentMethod::Dinheiro);
        assert_eq!(rows[0].updated_at, NOW + 1);
        assert_eq!(rows[0].marked_by, Some(admin));
    }

    #[tokio::test]
    async fn test_deleted_record_leaves_the_year() {
        let Some(pool) = testing::pool().await else {
            return;
        };
        let mut tx = pool.begin().await.unwrap();
        let (admin, member) = testing::seed_member(&mut tx, "delete").await;

        let recorded = upsert(&mut *tx, &march(member, 50, PaymentMethod::Pix), admin, NOW)
            .await
            .unwrap();
        assert_eq!(rows_for(&mut tx, member).await.len(), 1);

        let removed = delete(&mut *tx, recorded.id).await.unwrap();
        assert_eq!(removed.map(|p| p.id), Some(recorded.id));
        assert!(rows_for(&mut tx, member).await.is_empty());
        assert!(delete(&mut *tx, recorded.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_omitted_fields() {
        let Some(pool) = testing::pool().await else {
            return;
        };
        let mut tx = pool.begin().await.unwrap();
        let (admin, member) = testing::seed_member(&mut tx, "partial").await;
        let recorded = upsert(&mut *tx, &march(member, 50, PaymentMethod::Pix), admin, NOW)
            .await
            .unwrap();

        let blank_notes = PaymentUpdate {
            notes: Some(String::new()),
            ..Default::default()
        };
        let updated = update(&mut *tx, recorded.id, &blank_notes, admin, NOW + 5)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.notes, None);
        assert_eq!(updated.amount, Some(Decimal::from(50)));
        assert_eq!(updated.payment_method, PaymentMethod::Pix);
        assert_eq!(updated.paid_at, Some(NOW));
        assert_eq!(updated.updated_at, NOW + 5);

        let missing = update(&mut *tx, recorded.id + 1_000_000, &blank_notes, admin, NOW)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_switch_to_isento_clears_paid_at() {
        let Some(pool) = testing::pool().await else {
            return;
        };
        let mut tx = pool.begin().await.unwrap();
        let (admin, member) = testing::seed_member(&mut tx, "isento").await;
        let recorded = upsert(&mut *tx, &march(member, 50, PaymentMethod::Pix), admin, NOW)
            .await
            .unwrap();

        let exempt = PaymentUpdate {
            payment_method: Some(PaymentMethod::Isento),
            ..Default::default()
        };
        let updated = update(&mut *tx, recorded.id, &exempt, admin, NOW)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.payment_method, PaymentMethod::Isento);
        assert_eq!(updated.paid_at, None);

        let dated = PaymentUpdate {
            payment_method: Some(PaymentMethod::Isento),
            paid_at: Some(NOW - 10),
            ..Default::default()
        };
        let updated = update(&mut *tx, recorded.id, &dated, admin, NOW)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.paid_at, Some(NOW - 10));
    }
}
