//! Member self-service: the caller's own mensalidade status
//!
//! The member is resolved from the session, never from request input.

use axum::{Extension, Json, extract::State};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::ledger::{self, MemberFeeStatus};
use shared::models::{Maricultor, MonthlyPayment};

use crate::auth::SessionIdentity;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

#[derive(Serialize)]
pub struct MensalidadesResponse {
    pub maricultor_id: i64,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub monthly_fee_amount: Option<Decimal>,
    pub association_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub status: MemberFeeStatus,
    /// Records of the current year, by month
    pub payments: Vec<MonthlyPayment>,
}

async fn linked_member(state: &AppState, user_id: i64) -> Result<Maricultor, AppError> {
    db::maricultores::find_by_user(&state.pool, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MaricultorNotLinked))
}

/// GET /api/maricultor/mensalidades
pub async fn mensalidades(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<MensalidadesResponse> {
    let member = linked_member(&state, identity.user_id).await?;
    let today = state.today();

    let payments = db::payments::list_for_member(&state.pool, member.id, today.year())
        .await
        .map_err(internal)?;
    let recorded: Vec<i32> = payments.iter().map(|p| p.month).collect();
    let status = ledger::member_status(member.fee_exempt, &recorded, today);

    Ok(Json(MensalidadesResponse {
        maricultor_id: member.id,
        name: member.name,
        monthly_fee_amount: member.monthly_fee_amount,
        association_date: member.association_date,
        status,
        payments,
    }))
}

/// GET /api/maricultor/me
pub async fn profile(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<Maricultor> {
    linked_member(&state, identity.user_id).await.map(Json)
}
