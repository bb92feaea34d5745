//! Downloadable documents (statute, minutes, forms)
//!
//! Only the link is stored; the file itself lives on external storage.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Download, DownloadCreate, DownloadUpdate, ReorderRequest};
use shared::util::now_millis;

use crate::db;
use crate::db::content::Ordered;
use crate::state::AppState;

use super::{ApiResult, JsonBody, found, internal};

fn check_file_url(url: &str) -> AppResult<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::required("file_url"));
    }
    if !(url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/')) {
        return Err(AppError::validation("URL do arquivo inválida").with_detail("field", "file_url"));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Download>> {
    let downloads = db::content::downloads::list(&state.pool, false)
        .await
        .map_err(internal)?;
    Ok(Json(downloads))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(mut data): JsonBody<DownloadCreate>,
) -> ApiResult<Download> {
    data.title = data.title.trim().to_string();
    if data.title.is_empty() {
        return Err(AppError::required("title"));
    }
    check_file_url(&data.file_url)?;
    data.file_url = data.file_url.trim().to_string();

    let order = db::content::next_display_order(&state.pool, Ordered::Downloads)
        .await
        .map_err(internal)?;
    let download = db::content::downloads::create(&state.pool, &data, order, now_millis())
        .await
        .map_err(internal)?;
    tracing::info!(download_id = download.id, "Download created");
    Ok(Json(download))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(mut data): JsonBody<DownloadUpdate>,
) -> ApiResult<Download> {
    if data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::required("title"));
    }
    if let Some(url) = data.file_url.take() {
        check_file_url(&url)?;
        data.file_url = Some(url.trim().to_string());
    }
    let download = db::content::downloads::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(internal)?;
    found(download, ErrorCode::DownloadNotFound).map(Json)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::content::downloads::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::DownloadNotFound));
    }
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

pub async fn reorder(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> ApiResult<serde_json::Value> {
    let updated = db::content::reorder(&state.pool, Ordered::Downloads, &req.ids, now_millis())
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
