//! Browser push subscriptions of the logged-in user

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{PushMessage, PushSubscription, PushSubscriptionInput};
use shared::util::now_millis;

use crate::auth::SessionIdentity;
use crate::db;
use crate::push::{BroadcastReport, fan_out};
use crate::state::AppState;

use super::{ApiResult, JsonBody, internal};

/// POST /api/push/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    JsonBody(input): JsonBody<PushSubscriptionInput>,
) -> ApiResult<PushSubscription> {
    if !input.is_valid() {
        return Err(AppError::new(ErrorCode::PushSubscriptionInvalid));
    }
    let subscription = db::push_subscriptions::upsert(
        &state.pool,
        identity.user_id,
        &input.endpoint,
        input.keys.p256dh.trim(),
        input.keys.auth.trim(),
        now_millis(),
    )
    .await
    .map_err(internal)?;

    tracing::info!(user_id = identity.user_id, subscription_id = subscription.id, "Push subscription saved");
    Ok(Json(subscription))
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

/// DELETE /api/push/subscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    JsonBody(req): JsonBody<UnsubscribeRequest>,
) -> ApiResult<serde_json::Value> {
    let removed = db::push_subscriptions::delete_by_endpoint(&state.pool, identity.user_id, &req.endpoint)
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// Fan out and drop subscriptions the push service reports as gone
pub async fn deliver_and_prune(
    state: &AppState,
    subscriptions: &[PushSubscription],
    message: &PushMessage,
) -> BroadcastReport {
    let (report, gone) = fan_out(&state.push, subscriptions, message).await;
    if !gone.is_empty()
        && let Err(e) = db::push_subscriptions::delete_many(&state.pool, &gone).await
    {
        tracing::warn!(count = gone.len(), "Failed to remove expired push subscriptions: {e}");
    }
    report
}
