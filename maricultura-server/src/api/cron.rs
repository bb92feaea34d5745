//! Scheduled mensalidade reminder
//!
//! Triggered daily by an external scheduler. Only day 1 and the last three
//! days of the month send anything; a double trigger sends twice.

use axum::{Json, extract::State};
use chrono::{Datelike, NaiveDate};
use http::HeaderMap;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::ledger::{self, ReminderKind};
use shared::models::PushMessage;

use crate::auth::session::bearer_token;
use crate::db;
use crate::push::BroadcastReport;
use crate::state::AppState;

use super::push::deliver_and_prune;
use super::{ApiResult, internal};

#[derive(Debug, Serialize, PartialEq)]
pub struct ReminderReport {
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReminderKind>,
    /// Members without a record for the current month
    pub members: usize,
    #[serde(flatten)]
    pub delivery: BroadcastReport,
}

impl ReminderReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            kind: None,
            members: 0,
            delivery: BroadcastReport::default(),
        }
    }
}

pub fn reminder_message(kind: ReminderKind, today: NaiveDate) -> PushMessage {
    let period = format!("{:02}/{}", today.month(), today.year());
    let (title, body) = match kind {
        ReminderKind::DueToday => (
            "Mensalidade do mês".to_string(),
            format!("A mensalidade de {period} já está disponível para pagamento."),
        ),
        ReminderKind::EndOfMonth => (
            "Lembrete de mensalidade".to_string(),
            format!("A mensalidade de {period} ainda não foi registrada. O mês está acabando."),
        ),
    };
    PushMessage {
        title,
        body,
        url: Some("/area-do-maricultor".to_string()),
    }
}

fn authorize(headers: &HeaderMap, secret: &str) -> Result<(), AppError> {
    match bearer_token(headers) {
        Some(token) if token == secret => Ok(()),
        _ => Err(AppError::new(ErrorCode::CronUnauthorized)),
    }
}

/// GET /api/cron/mensalidade-reminder
pub async fn mensalidade_reminder(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ReminderReport> {
    authorize(&headers, &state.cron_secret)?;

    let today = state.today();
    let Some(kind) = ledger::reminder_kind(today) else {
        tracing::debug!(%today, "No reminder due today");
        return Ok(Json(ReminderReport::skipped()));
    };

    let user_ids =
        db::maricultores::users_missing_payment(&state.pool, today.year(), today.month() as i32)
            .await
            .map_err(internal)?;

    let delivery = if user_ids.is_empty() || !state.push.is_enabled() {
        BroadcastReport::default()
    } else {
        let subscriptions = db::push_subscriptions::list_for_users(&state.pool, &user_ids)
            .await
            .map_err(internal)?;
        deliver_and_prune(&state, &subscriptions, &reminder_message(kind, today)).await
    };

    tracing::info!(
        ?kind,
        members = user_ids.len(),
        sent = delivery.sent,
        failed = delivery.failed,
        removed = delivery.removed,
        "Mensalidade reminder run"
    );
    Ok(Json(ReminderReport {
        skipped: false,
        kind: Some(kind),
        members: user_ids.len(),
        delivery,
    }))
}
