//! Append-only payment audit log

use serde::Serialize;
use shared::models::MonthlyPayment;
use sqlx::{PgExecutor, PgPool};

use crate::error::BoxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    Recorded,
    Updated,
    Deleted,
}

impl PaymentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Write an audit entry holding a snapshot of the row after the action
/// (before it, for deletes)
pub async fn log_payment(
    executor: impl PgExecutor<'_>,
    action: PaymentAction,
    payment: &MonthlyPayment,
    actor_id: i64,
    now: i64,
) -> Result<(), BoxError> {
    let snapshot = serde_json::to_value(payment)?;
    sqlx::query(
        "INSERT INTO payment_audit (payment_id, action, snapshot, actor_id, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(payment.id)
    .bind(action.as_str())
    .bind(snapshot)
    .bind(actor_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub payment_id: i64,
    pub action: String,
    pub snapshot: serde_json::Value,
    pub actor_id: Option<i64>,
    pub created_at: i64,
}

/// History of one payment, newest first
pub async fn payment_history(
    pool: &PgPool,
    payment_id: i64,
) -> Result<Vec<AuditEntry>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM payment_audit WHERE payment_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(payment_id)
    .fetch_all(pool)
    .await
}
