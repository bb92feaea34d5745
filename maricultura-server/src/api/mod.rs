//! HTTP API
//!
//! Route groups, outermost guard first:
//! - public site and health (no auth)
//! - login / password reset / contact (per-IP rate limited)
//! - session routes (`session_auth`)
//! - back office (`session_auth` then `require_admin`)
//! - cron (shared bearer secret, checked in the handler)

pub mod admin;
pub mod auth;
pub mod cron;
pub mod health;
pub mod maricultor;
pub mod payments;
pub mod public;
pub mod push;

use axum::extract::FromRequest;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;

use crate::auth::rate_limit::{contact_rate_limit, login_rate_limit, password_reset_rate_limit};
use crate::auth::{require_admin, session_auth};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// JSON request body; malformed input is a 400 in the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Persistence failure: logged and surfaced as 500 with the driver message
pub fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Query error: {e}");
    AppError::database(e.to_string())
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/public/news", get(public::news))
        .route("/api/public/news/{slug}", get(public::news_by_slug))
        .route("/api/public/events", get(public::events))
        .route("/api/public/projects", get(public::projects))
        .route("/api/public/downloads", get(public::downloads))
        .route("/api/public/about", get(public::about))
        .route("/api/public/producers", get(public::producers));

    let contact = Router::new()
        .route("/api/public/contact", post(public::contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            contact_rate_limit,
        ));

    let login = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let password_reset = Router::new()
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            password_reset_rate_limit,
        ));

    // Any logged-in account
    let session = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/change-password", post(auth::change_password))
        .route(
            "/api/push/subscribe",
            post(push::subscribe).delete(push::unsubscribe),
        )
        .route("/api/maricultor/me", get(maricultor::profile))
        .route("/api/maricultor/mensalidades", get(maricultor::mensalidades))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_auth));

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/cron/mensalidade-reminder",
            get(cron::mensalidade_reminder),
        )
        .merge(public)
        .merge(contact)
        .merge(login)
        .merge(password_reset)
        .merge(session)
        .merge(admin_router(&state))
        .with_state(state)
}

fn admin_router(state: &AppState) -> Router<AppState> {
    let payments = Router::new()
        .route(
            "/api/admin/payments",
            get(payments::year_grid).post(payments::record_payment),
        )
        .route("/api/admin/payments/summary", get(payments::summary))
        .route(
            "/api/admin/payments/monthly-stats",
            get(payments::monthly_stats),
        )
        .route(
            "/api/admin/payments/{id}",
            put(payments::update_payment).delete(payments::delete_payment),
        )
        .route("/api/admin/payments/{id}/history", get(payments::history));

    let maricultores = Router::new()
        .route(
            "/api/admin/maricultores",
            get(admin::maricultores::list).post(admin::maricultores::create),
        )
        .route(
            "/api/admin/maricultores/{id}",
            get(admin::maricultores::get)
                .put(admin::maricultores::update)
                .delete(admin::maricultores::deactivate),
        )
        .route(
            "/api/admin/maricultores/{id}/access",
            post(admin::maricultores::grant_access),
        )
        .route(
            "/api/admin/maricultores/{id}/password",
            post(admin::maricultores::reset_password),
        );

    let users = Router::new()
        .route(
            "/api/admin/users",
            get(admin::users::list).post(admin::users::create),
        )
        .route(
            "/api/admin/users/{id}",
            put(admin::users::update).delete(admin::users::delete),
        );

    let news = Router::new()
        .route(
            "/api/admin/news",
            get(admin::news::list).post(admin::news::create),
        )
        .route(
            "/api/admin/news/{id}",
            get(admin::news::get)
                .put(admin::news::update)
                .delete(admin::news::delete),
        )
        .route("/api/admin/news/{id}/publish", post(admin::news::publish));

    let events = Router::new()
        .route(
            "/api/admin/events",
            get(admin::events::list).post(admin::events::create),
        )
        .route("/api/admin/events/reorder", post(admin::events::reorder))
        .route(
            "/api/admin/events/{id}",
            put(admin::events::update).delete(admin::events::delete),
        );

    let projects = Router::new()
        .route(
            "/api/admin/projects",
            get(admin::projects::list).post(admin::projects::create),
        )
        .route("/api/admin/projects/reorder", post(admin::projects::reorder))
        .route(
            "/api/admin/projects/{id}",
            put(admin::projects::update).delete(admin::projects::delete),
        );

    let downloads = Router::new()
        .route(
            "/api/admin/downloads",
            get(admin::downloads::list).post(admin::downloads::create),
        )
        .route(
            "/api/admin/downloads/reorder",
            post(admin::downloads::reorder),
        )
        .route(
            "/api/admin/downloads/{id}",
            put(admin::downloads::update).delete(admin::downloads::delete),
        );

    let about = Router::new()
        .route(
            "/api/admin/about",
            get(admin::about::list).post(admin::about::create),
        )
        .route("/api/admin/about/reorder", post(admin::about::reorder))
        .route(
            "/api/admin/about/{id}",
            put(admin::about::update).delete(admin::about::delete),
        );

    Router::new()
        .merge(payments)
        .merge(maricultores)
        .merge(users)
        .merge(news)
        .merge(events)
        .merge(projects)
        .merge(downloads)
        .merge(about)
        .route("/api/admin/push/send", post(admin::push::send))
        // Last added runs first: session_auth inserts the identity require_admin reads
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode, header};
    use shared::error::ErrorCode;
    use shared::models::Role;
    use tower::ServiceExt;

    use crate::auth::session::create_token;

    fn app() -> Router {
        create_router(AppState::for_tests())
    }

    fn token(role: Role) -> String {
        create_token(7, role, "test-secret").unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn get_with(uri: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, bearer: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), get_with("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "maricultura-server");
    }

    #[tokio::test]
    async fn test_admin_routes_need_a_session() {
        for uri in [
            "/api/admin/payments",
            "/api/admin/maricultores",
            "/api/admin/users",
            "/api/admin/news",
        ] {
            let (status, body) = send(app(), get_with(uri, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let (status, body) = send(app(), get_with("/api/auth/me", Some("not-a-jwt"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], ErrorCode::TokenInvalid.code());
    }

    #[tokio::test]
    async fn test_member_token_cannot_reach_admin_routes() {
        let member = token(Role::Maricultor);
        let (status, body) = send(app(), get_with("/api/admin/payments", Some(&member))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], ErrorCode::AdminRequired.code());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_a_500() {
        // Admin claim is re-checked against the profile table
        let admin = token(Role::Admin);
        let (status, body) = send(app(), get_with("/api/admin/payments", Some(&admin))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], ErrorCode::DatabaseError.code());
    }

    #[tokio::test]
    async fn test_cron_requires_secret() {
        let (status, body) = send(app(), get_with("/api/cron/mensalidade-reminder", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], ErrorCode::CronUnauthorized.code());

        let (status, _) = send(
            app(),
            get_with("/api/cron/mensalidade-reminder", Some("wrong")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_push_subscription_is_validated() {
        let member = token(Role::Maricultor);
        let request = post_json(
            "/api/push/subscribe",
            Some(&member),
            serde_json::json!({
                "endpoint": "http://push.example.org/abc",
                "keys": { "p256dh": "key", "auth": "auth" }
            }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::PushSubscriptionInvalid.code());
    }

    #[tokio::test]
    async fn test_contact_form_is_validated() {
        let request = post_json(
            "/api/public/contact",
            None,
            serde_json::json!({ "name": "Ana", "email": "ana", "message": "Olá" }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::ValidationFailed.code());
    }

    #[tokio::test]
    async fn test_contact_without_inbox_fails_delivery() {
        let request = post_json(
            "/api/public/contact",
            None,
            serde_json::json!({ "name": "Ana", "email": "ana@example.org", "message": "Olá" }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], ErrorCode::EmailDeliveryFailed.code());
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let router = app();
        for _ in 0..5 {
            let request = post_json(
                "/api/auth/login",
                None,
                serde_json::json!({ "identifier": " ", "password": "x" }),
            );
            let (status, body) = send(router.clone(), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], ErrorCode::RequiredField.code());
        }
        let request = post_json(
            "/api/auth/login",
            None,
            serde_json::json!({ "identifier": " ", "password": "x" }),
        );
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], ErrorCode::TooManyRequests.code());
    }

    #[tokio::test]
    async fn test_login_accepts_email_or_phone_field() {
        let request = post_json(
            "/api/auth/login",
            None,
            serde_json::json!({ "phone": "123", "password": "segredo123" }),
        );
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::InvalidPhone.code());
    }

    #[tokio::test]
    async fn test_mistyped_payment_body_uses_error_envelope() {
        use crate::auth::SessionIdentity;

        let router = Router::new()
            .route("/api/admin/payments", post(payments::record_payment))
            .layer(axum::Extension(SessionIdentity {
                user_id: 7,
                role: Role::Admin,
            }))
            .with_state(AppState::for_tests());
        let request = post_json(
            "/api/admin/payments",
            None,
            serde_json::json!({ "maricultor_id": 1, "year": 2025, "month": "3" }),
        );
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::ValidationFailed.code());
        assert!(body["message"].as_str().unwrap().contains("month"));
    }

    #[tokio::test]
    async fn test_body_without_json_content_type_is_rejected() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/public/contact")
            .body(Body::from("name=Ana"))
            .unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::InvalidRequest.code());
    }
}
