//! Public site endpoints (no auth)

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::identity::require_phone;
use shared::models::{AboutSection, Download, Event, News, ProducerPin, Project};
use shared::util::now_millis;

use crate::db;
use crate::email::ContactMessage;
use crate::state::AppState;
use crate::util::non_blank;

use super::{ApiResult, JsonBody, internal};

const DEFAULT_NEWS_LIMIT: i64 = 20;
const MAX_NEWS_LIMIT: i64 = 100;
const MAX_MESSAGE_LEN: usize = 5_000;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub limit: Option<i64>,
}

fn news_limit(requested: Option<i64>) -> i64 {
    requested
        .filter(|l| *l > 0)
        .map_or(DEFAULT_NEWS_LIMIT, |l| l.min(MAX_NEWS_LIMIT))
}

pub async fn news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Vec<News>> {
    let news = db::content::news::list_published(&state.pool, news_limit(query.limit))
        .await
        .map_err(internal)?;
    Ok(Json(news))
}

pub async fn news_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<News> {
    db::content::news::find_published_by_slug(&state.pool, &slug)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::NewsNotFound))
}

pub async fn events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    let events = db::content::events::list_published(&state.pool, now_millis())
        .await
        .map_err(internal)?;
    Ok(Json(events))
}

pub async fn projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let projects = db::content::projects::list(&state.pool, true)
        .await
        .map_err(internal)?;
    Ok(Json(projects))
}

pub async fn downloads(State(state): State<AppState>) -> ApiResult<Vec<Download>> {
    let downloads = db::content::downloads::list(&state.pool, true)
        .await
        .map_err(internal)?;
    Ok(Json(downloads))
}

pub async fn about(State(state): State<AppState>) -> ApiResult<Vec<AboutSection>> {
    let sections = db::content::about::list(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(sections))
}

/// Map pins: active members that opted in and have coordinates
pub async fn producers(State(state): State<AppState>) -> ApiResult<Vec<ProducerPin>> {
    let pins = db::maricultores::producer_pins(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(pins))
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

fn validate_contact(req: ContactRequest) -> AppResult<ContactMessage> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::required("name"));
    }
    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::required("email"));
    }
    if !email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
    {
        return Err(AppError::validation("E-mail inválido").with_detail("field", "email"));
    }
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::required("message"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::new(ErrorCode::ValueOutOfRange)
            .with_detail("field", "message")
            .with_detail("max_length", MAX_MESSAGE_LEN as u64));
    }
    let phone = non_blank(req.phone.as_deref())
        .map(|p| require_phone(&p))
        .transpose()?;

    Ok(ContactMessage {
        name: name.to_string(),
        email,
        phone,
        subject: non_blank(req.subject.as_deref()),
        message: message.to_string(),
    })
}

/// POST /api/public/contact
pub async fn contact(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ContactRequest>,
) -> ApiResult<serde_json::Value> {
    let msg = validate_contact(req)?;

    let Some(inbox) = state
        .contact_inbox
        .as_deref()
        .filter(|_| state.email.is_enabled())
    else {
        tracing::error!("Contact form used but SMTP or CONTACT_INBOX is not configured");
        return Err(AppError::new(ErrorCode::EmailDeliveryFailed));
    };
    state.email.send_contact(inbox, &msg).await.map_err(|e| {
        tracing::error!("Contact message not delivered: {e}");
        AppError::new(ErrorCode::EmailDeliveryFailed)
    })?;

    Ok(Json(serde_json::json!({ "message": "Mensagem enviada" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: " João ".to_string(),
            email: "Joao@Example.org".to_string(),
            phone: Some("(48) 99123-4567".to_string()),
            subject: Some("  ".to_string()),
            message: " Quero me associar. ".to_string(),
        }
    }

    #[test]
    fn test_news_limit() {
        assert_eq!(news_limit(None), 20);
        assert_eq!(news_limit(Some(5)), 5);
        assert_eq!(news_limit(Some(0)), 20);
        assert_eq!(news_limit(Some(-3)), 20);
        assert_eq!(news_limit(Some(1_000)), 100);
    }

    #[test]
    fn test_contact_is_normalized() {
        let msg = validate_contact(request()).unwrap();
        assert_eq!(msg.name, "João");
        assert_eq!(msg.email, "joao@example.org");
        assert_eq!(msg.phone.as_deref(), Some("48991234567"));
        assert_eq!(msg.subject, None);
        assert_eq!(msg.message, "Quero me associar.");
    }

    #[test]
    fn test_contact_rejects_invalid_fields() {
        let mut req = request();
        req.email = "joao".to_string();
        assert_eq!(validate_contact(req).unwrap_err().code, ErrorCode::ValidationFailed);

        let mut req = request();
        req.message = "   ".to_string();
        assert_eq!(validate_contact(req).unwrap_err().code, ErrorCode::RequiredField);

        let mut req = request();
        req.message = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert_eq!(validate_contact(req).unwrap_err().code, ErrorCode::ValueOutOfRange);
    }
}
