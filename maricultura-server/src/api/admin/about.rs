//! "Quem somos" page sections

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{AboutSection, AboutSectionCreate, AboutSectionUpdate, ReorderRequest};
use shared::util::now_millis;

use crate::db;
use crate::db::content::Ordered;
use crate::error::unique_violation;
use crate::state::AppState;

use super::{ApiResult, JsonBody, found, internal};

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<AboutSection>> {
    let sections = db::content::about::list(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(sections))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(mut data): JsonBody<AboutSectionCreate>,
) -> ApiResult<AboutSection> {
    data.section_key = data.section_key.trim().to_lowercase();
    if data.section_key.is_empty() {
        return Err(AppError::required("section_key"));
    }
    if data.title.trim().is_empty() {
        return Err(AppError::required("title"));
    }

    let order = db::content::next_display_order(&state.pool, Ordered::About)
        .await
        .map_err(internal)?;
    let section = db::content::about::create(&state.pool, &data, order, now_millis())
        .await
        .map_err(|e| AppError::from(unique_violation(e, ErrorCode::AboutSectionKeyExists)))?;
    tracing::info!(section_key = %section.section_key, "About section created");
    Ok(Json(section))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(data): JsonBody<AboutSectionUpdate>,
) -> ApiResult<AboutSection> {
    if data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::required("title"));
    }
    let section = db::content::about::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(internal)?;
    found(section, ErrorCode::AboutSectionNotFound).map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::content::about::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::AboutSectionNotFound));
    }
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

pub async fn reorder(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> ApiResult<serde_json::Value> {
    let updated = db::content::reorder(&state.pool, Ordered::About, &req.ids, now_millis())
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
