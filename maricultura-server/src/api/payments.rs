//! Mensalidade ledger endpoints (admin)

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::ledger::{self, MemberYearRow, MonthlyStat, PaymentSummary};
use shared::models::{MonthlyPayment, PaymentCreate, PaymentUpdate};
use shared::util::now_millis;

use crate::auth::SessionIdentity;
use crate::db;
use crate::db::audit::{AuditEntry, PaymentAction};
use crate::state::AppState;

use super::{ApiResult, JsonBody, internal};

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Kept as text so a malformed year is a ledger validation error
    pub year: Option<String>,
}

/// Parse `?year=`, defaulting to the current year
pub fn parse_year(raw: Option<&str>, current_year: i32) -> AppResult<i32> {
    let year = match raw.map(str::trim).filter(|y| !y.is_empty()) {
        None => current_year,
        Some(y) => y
            .parse::<i32>()
            .map_err(|_| AppError::new(ErrorCode::PaymentInvalidYear).with_detail("year", y))?,
    };
    ledger::validate_year(year)
}

#[derive(Serialize)]
pub struct YearGrid {
    pub year: i32,
    pub maricultores: Vec<MemberYearRow>,
}

/// GET /api/admin/payments?year=Y
pub async fn year_grid(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<YearGrid> {
    let year = parse_year(query.year.as_deref(), state.today().year())?;

    let members = db::maricultores::ledger_members(&state.pool)
        .await
        .map_err(internal)?;
    let payments = db::payments::list_year(&state.pool, year)
        .await
        .map_err(internal)?;

    Ok(Json(YearGrid {
        year,
        maricultores: ledger::build_year_grid(year, members, payments),
    }))
}

/// POST /api/admin/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    JsonBody(input): JsonBody<PaymentCreate>,
) -> ApiResult<MonthlyPayment> {
    let now = now_millis();
    let validated = ledger::validate_payment(&input, now)?;

    db::maricultores::find(&state.pool, validated.maricultor_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MaricultorNotFound))?;

    let payment = db::payments::upsert(&state.pool, &validated, identity.user_id, now)
        .await
        .map_err(internal)?;

    audit(&state, PaymentAction::Recorded, &payment, identity.user_id, now).await;
    tracing::info!(
        payment_id = payment.id,
        maricultor_id = payment.maricultor_id,
        year = payment.year,
        month = payment.month,
        method = %payment.payment_method,
        "Payment recorded"
    );
    Ok(Json(payment))
}

/// PUT /api/admin/payments/{id}
pub async fn update_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<PaymentUpdate>,
) -> ApiResult<MonthlyPayment> {
    let data = ledger::normalize_update(input);
    let now = now_millis();

    let payment = db::payments::update(&state.pool, id, &data, identity.user_id, now)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    audit(&state, PaymentAction::Updated, &payment, identity.user_id, now).await;
    tracing::info!(payment_id = id, "Payment updated");
    Ok(Json(payment))
}

/// DELETE /api/admin/payments/{id}
pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::payments::delete(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    audit(&state, PaymentAction::Deleted, &removed, identity.user_id, now_millis()).await;
    tracing::info!(payment_id = id, "Payment deleted");
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

/// GET /api/admin/payments/summary?year=Y
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<PaymentSummary> {
    let year = parse_year(query.year.as_deref(), state.today().year())?;

    let payments = db::payments::list_year(&state.pool, year)
        .await
        .map_err(internal)?;
    let active_members = db::maricultores::count_active(&state.pool)
        .await
        .map_err(internal)?;

    Ok(Json(ledger::summarize_year(year, &payments, active_members)))
}

/// GET /api/admin/payments/monthly-stats
pub async fn monthly_stats(State(state): State<AppState>) -> ApiResult<Vec<MonthlyStat>> {
    let today = state.today();
    let (start_year, start_month) = ledger::monthly_stats_window_start(today);

    let payments = db::payments::list_since(&state.pool, start_year, start_month as i32)
        .await
        .map_err(internal)?;

    Ok(Json(ledger::monthly_stats(&payments, today)))
}

/// GET /api/admin/payments/{id}/history
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<AuditEntry>> {
    let entries = db::audit::payment_history(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(entries))
}

/// Audit failures are logged, never surfaced
async fn audit(
    state: &AppState,
    action: PaymentAction,
    payment: &MonthlyPayment,
    actor_id: i64,
    now: i64,
) {
    if let Err(e) = db::audit::log_payment(&state.pool, action, payment, actor_id, now).await {
        tracing::warn!(payment_id = payment.id, action = action.as_str(), "Audit write failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_defaults_to_current() {
        assert_eq!(parse_year(None, 2025).unwrap(), 2025);
        assert_eq!(parse_year(Some(" "), 2025).unwrap(), 2025);
        assert_eq!(parse_year(Some("2024"), 2025).unwrap(), 2024);
    }

    #[test]
    fn test_parse_year_rejects_garbage_and_range() {
        for raw in ["abc", "1999", "2101", "20.5"] {
            let err = parse_year(Some(raw), 2025).unwrap_err();
            assert_eq!(err.code, ErrorCode::PaymentInvalidYear);
            assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        }
    }
}
