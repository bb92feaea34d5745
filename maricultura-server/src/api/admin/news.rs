use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{News, NewsCreate, NewsUpdate, slugify};
use shared::util::now_millis;

use crate::db;
use crate::error::unique_violation;
use crate::state::AppState;

use super::{ApiResult, JsonBody, found, internal};

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

/// Slug from the explicit value or the title; must not come out empty
fn resolve_slug(explicit: Option<&str>, title: &str) -> AppResult<String> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => slugify(s),
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(AppError::validation("Não foi possível gerar o slug").with_detail("field", "slug"));
    }
    Ok(slug)
}

fn slug_conflict(e: sqlx::Error) -> AppError {
    unique_violation(e, ErrorCode::NewsSlugExists).into()
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<News>> {
    let news = db::content::news::list_all(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(news))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<News> {
    let news = db::content::news::find(&state.pool, id)
        .await
        .map_err(internal)?;
    found(news, ErrorCode::NewsNotFound).map(Json)
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(mut data): JsonBody<NewsCreate>,
) -> ApiResult<News> {
    data.title = data.title.trim().to_string();
    if data.title.is_empty() {
        return Err(AppError::required("title"));
    }
    if data.content.trim().is_empty() {
        return Err(AppError::required("content"));
    }
    let slug = resolve_slug(data.slug.as_deref(), &data.title)?;

    let news = db::content::news::create(&state.pool, &data, &slug, now_millis())
        .await
        .map_err(slug_conflict)?;
    tracing::info!(news_id = news.id, slug = %news.slug, "News created");
    Ok(Json(news))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(mut data): JsonBody<NewsUpdate>,
) -> ApiResult<News> {
    if let Some(title) = &data.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::required("title"));
        }
        data.title = Some(title.to_string());
    }
    if let Some(slug) = data.slug.take() {
        data.slug = Some(resolve_slug(Some(&slug), &slug)?);
    }

    let news = db::content::news::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(slug_conflict)?;
    found(news, ErrorCode::NewsNotFound).map(Json)
}

/// POST /api/admin/news/{id}/publish
pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<PublishRequest>,
) -> ApiResult<News> {
    let news = db::content::news::set_published(&state.pool, id, req.published, now_millis())
        .await
        .map_err(internal)?;
    let news = found(news, ErrorCode::NewsNotFound)?;
    tracing::info!(news_id = id, published = req.published, "News publish state changed");
    Ok(Json(news))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::content::news::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::NewsNotFound));
    }
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_prefers_explicit_value() {
        assert_eq!(
            resolve_slug(Some(" Festa da Tainha "), "ignored").unwrap(),
            "festa-da-tainha"
        );
        assert_eq!(
            resolve_slug(None, "Curso de Manejo").unwrap(),
            "curso-de-manejo"
        );
        assert_eq!(resolve_slug(Some(""), "Ostras").unwrap(), "ostras");
    }

    #[test]
    fn test_slug_cannot_be_empty() {
        let err = resolve_slug(None, "!!!").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
