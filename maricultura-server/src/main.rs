//! maricultura-server: back office API for the maricultores association
//!
//! Long-running service that:
//! - Keeps the mensalidade (membership fee) ledger
//! - Manages members, staff logins and the public site content
//! - Relays contact messages and sends web push reminders

mod api;
mod auth;
mod config;
mod db;
mod email;
mod error;
mod push;
mod state;
mod util;

use std::net::SocketAddr;
use std::time::Duration;

use http::{HeaderValue, Method, header};
use shared::models::Role;
use shared::util::now_millis;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use error::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maricultura_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting maricultura-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    bootstrap_admin(&state, &config).await?;

    let app = api::create_router(state.clone())
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    // Periodic cleanup (every 5 minutes): rate limiter windows and stale reset codes
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            cleanup_state.rate_limiter.cleanup().await;
            match db::password_resets::purge_expired(&cleanup_state.pool, now_millis()).await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(count = n, "Purged expired password reset codes"),
                Err(e) => tracing::warn!("Password reset purge failed: {e}"),
            }
        }
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("maricultura-server HTTP listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Any origin in development, only the public site otherwise
fn cors_layer(config: &Config) -> Result<CorsLayer, BoxError> {
    if config.is_development() {
        return Ok(CorsLayer::permissive());
    }
    let origin = HeaderValue::from_str(&config.site_url)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// Create the first admin from ADMIN_EMAIL/ADMIN_PASSWORD when none is active
async fn bootstrap_admin(state: &AppState, config: &Config) -> Result<(), BoxError> {
    let Some((email, password)) = &config.bootstrap_admin else {
        return Ok(());
    };
    if db::profiles::count_active_admins(&state.pool).await? > 0 {
        return Ok(());
    }
    if db::profiles::find_login_by_email(&state.pool, email)
        .await?
        .is_some()
    {
        tracing::warn!(email = %email, "ADMIN_EMAIL already has an account; no admin created");
        return Ok(());
    }

    let hashed = util::new_password_hash(password).map_err(|e| e.message)?;
    let profile = db::profiles::create(
        &state.pool,
        &db::profiles::NewProfile {
            name: "Administrador",
            email: Some(email.as_str()),
            phone: None,
            hashed_password: &hashed,
            role: Role::Admin.as_str(),
        },
        now_millis(),
    )
    .await?;

    tracing::info!(user_id = profile.id, email = %email, "Bootstrap admin created");
    Ok(())
}
