//! Event agenda management

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Event, EventCreate, EventUpdate, ReorderRequest};
use shared::util::now_millis;

use crate::db;
use crate::db::content::Ordered;
use crate::state::AppState;

use super::{ApiResult, JsonBody, found, internal};

fn check_range(starts_at: i64, ends_at: Option<i64>) -> AppResult<()> {
    if ends_at.is_some_and(|end| end < starts_at) {
        return Err(AppError::new(ErrorCode::ValueOutOfRange).with_detail("field", "ends_at"));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    let events = db::content::events::list_all(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(events))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(mut data): JsonBody<EventCreate>,
) -> ApiResult<Event> {
    data.title = data.title.trim().to_string();
    if data.title.is_empty() {
        return Err(AppError::required("title"));
    }
    check_range(data.starts_at, data.ends_at)?;

    let order = db::content::next_display_order(&state.pool, Ordered::Events)
        .await
        .map_err(internal)?;
    let event = db::content::events::create(&state.pool, &data, order, now_millis())
        .await
        .map_err(internal)?;
    tracing::info!(event_id = event.id, "Event created");
    Ok(Json(event))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(data): JsonBody<EventUpdate>,
) -> ApiResult<Event> {
    if data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::required("title"));
    }
    if let Some(starts_at) = data.starts_at {
        check_range(starts_at, data.ends_at)?;
    }
    let event = db::content::events::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(internal)?;
    found(event, ErrorCode::EventNotFound).map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::content::events::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::EventNotFound));
    }
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

/// POST /api/admin/events/reorder
pub async fn reorder(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> ApiResult<serde_json::Value> {
    let updated = db::content::reorder(&state.pool, Ordered::Events, &req.ids, now_millis())
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cannot_end_before_start() {
        assert!(check_range(1_000, None).is_ok());
        assert!(check_range(1_000, Some(1_000)).is_ok());
        let err = check_range(1_000, Some(999)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }
}
