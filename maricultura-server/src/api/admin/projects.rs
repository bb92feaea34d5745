use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Project, ProjectCreate, ProjectUpdate, ReorderRequest};
use shared::util::now_millis;

use crate::db;
use crate::db::content::Ordered;
use crate::state::AppState;

use super::{ApiResult, JsonBody, found, internal};

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let projects = db::content::projects::list(&state.pool, false)
        .await
        .map_err(internal)?;
    Ok(Json(projects))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(mut data): JsonBody<ProjectCreate>,
) -> ApiResult<Project> {
    data.title = data.title.trim().to_string();
    if data.title.is_empty() {
        return Err(AppError::required("title"));
    }
    let order = db::content::next_display_order(&state.pool, Ordered::Projects)
        .await
        .map_err(internal)?;
    let project = db::content::projects::create(&state.pool, &data, order, now_millis())
        .await
        .map_err(internal)?;
    tracing::info!(project_id = project.id, "Project created");
    Ok(Json(project))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(data): JsonBody<ProjectUpdate>,
) -> ApiResult<Project> {
    if data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::required("title"));
    }
    let project = db::content::projects::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(internal)?;
    found(project, ErrorCode::ProjectNotFound).map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::content::projects::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ProjectNotFound));
    }
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

pub async fn reorder(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> ApiResult<serde_json::Value> {
    let updated = db::content::reorder(&state.pool, Ordered::Projects, &req.ids, now_millis())
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
