//! Manual push broadcast from the back office

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::PushMessage;

use crate::api::push::deliver_and_prune;
use crate::db;
use crate::push::BroadcastReport;
use crate::state::AppState;

use super::{ApiResult, JsonBody, internal};

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub title: String,
    pub body: String,
    pub url: Option<String>,
    /// Restrict delivery to these accounts; everyone when absent
    pub user_ids: Option<Vec<i64>>,
}

/// POST /api/admin/push/send
pub async fn send(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BroadcastRequest>,
) -> ApiResult<BroadcastReport> {
    if !state.push.is_enabled() {
        return Err(AppError::new(ErrorCode::PushNotConfigured));
    }
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::required("title"));
    }
    let body = req.body.trim();
    if body.is_empty() {
        return Err(AppError::required("body"));
    }

    let subscriptions = match &req.user_ids {
        Some(ids) => db::push_subscriptions::list_for_users(&state.pool, ids).await,
        None => db::push_subscriptions::list_all(&state.pool).await,
    }
    .map_err(internal)?;

    let message = PushMessage {
        title: title.to_string(),
        body: body.to_string(),
        url: req.url.filter(|u| !u.trim().is_empty()),
    };
    let report = deliver_and_prune(&state, &subscriptions, &message).await;

    tracing::info!(
        sent = report.sent,
        failed = report.failed,
        removed = report.removed,
        "Push broadcast"
    );
    Ok(Json(report))
}
