//! Authentication endpoints: login, me, change-password, forgot/reset-password

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::identity::{LoginIdentifier, deliverable_email};
use shared::models::{Maricultor, Profile, Role};
use shared::util::now_millis;

use crate::auth::SessionIdentity;
use crate::db;
use crate::state::AppState;
use crate::util::{generate_code, hash_password, new_password_hash, verify_password};

use super::{ApiResult, JsonBody, internal};

/// Reset codes are valid for 30 minutes
const RESET_CODE_TTL_MS: i64 = 30 * 60 * 1000;
const RESET_MAX_ATTEMPTS: i32 = 5;

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Email or phone number
    #[serde(alias = "email", alias = "phone")]
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Profile,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let identifier = LoginIdentifier::parse(&req.identifier)?;
    let found = match &identifier {
        LoginIdentifier::Email(email) => db::profiles::find_login_by_email(&state.pool, email).await,
        LoginIdentifier::Phone(phone) => db::profiles::find_login_by_phone(&state.pool, phone).await,
    }
    .map_err(internal)?
    .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &found.hashed_password) {
        return Err(AppError::invalid_credentials());
    }
    let user = found.profile;
    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    let role = user.role().ok_or_else(|| {
        tracing::error!(user_id = user.id, role = %user.role, "Profile has unknown role");
        AppError::new(ErrorCode::AccountDisabled)
    })?;

    let token = crate::auth::session::create_token(user.id, role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    tracing::info!(user_id = user.id, role = %role, "Login");
    Ok(Json(LoginResponse { token, user }))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: Profile,
    /// Linked member record, for maricultor accounts
    pub maricultor: Option<Maricultor>,
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<MeResponse> {
    let user = db::profiles::find_by_id(&state.pool, identity.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(AppError::not_authenticated)?;

    let maricultor = if user.role() == Some(Role::Maricultor) {
        db::maricultores::find_by_user(&state.pool, user.id)
            .await
            .map_err(internal)?
    } else {
        None
    };

    Ok(Json(MeResponse { user, maricultor }))
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let found = db::profiles::find_login_by_id(&state.pool, identity.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(AppError::not_authenticated)?;

    if !verify_password(&req.current_password, &found.hashed_password) {
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Senha atual incorreta",
        ));
    }

    let hashed = new_password_hash(&req.new_password)?;
    db::profiles::update_password(&state.pool, identity.user_id, &hashed, now_millis())
        .await
        .map_err(internal)?;

    tracing::info!(user_id = identity.user_id, "Password changed");
    Ok(Json(serde_json::json!({ "message": "Senha alterada" })))
}

// ── Password reset ──

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

const FORGOT_PASSWORD_REPLY: &str = "Se o e-mail estiver cadastrado, enviaremos um código";

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ForgotPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let reply = Json(serde_json::json!({ "message": FORGOT_PASSWORD_REPLY }));
    let email = req.email.trim().to_lowercase();

    // Same reply whether or not the address exists
    let Some(email) = deliverable_email(Some(&email)).map(str::to_string) else {
        return Ok(reply);
    };
    let profile = match db::profiles::find_login_by_email(&state.pool, &email).await {
        Ok(Some(p)) if p.profile.is_active => p.profile,
        Ok(_) => return Ok(reply),
        Err(e) => {
            tracing::error!("DB error during forgot-password: {e}");
            return Ok(reply);
        }
    };

    let code = generate_code();
    let code_hash = hash_password(&code).map_err(|_| AppError::new(ErrorCode::InternalError))?;
    let now = now_millis();

    db::password_resets::upsert(&state.pool, &email, &code_hash, now + RESET_CODE_TTL_MS, now)
        .await
        .map_err(internal)?;

    if let Err(e) = state.email.send_password_reset_code(&email, &code).await {
        tracing::error!(user_id = profile.id, "Failed to send reset code: {e}");
    }

    Ok(reply)
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email = req.email.trim().to_lowercase();
    let hashed = new_password_hash(&req.new_password)?;

    let record = db::password_resets::find(&state.pool, &email)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;

    let now = now_millis();
    if now > record.expires_at {
        let _ = db::password_resets::delete(&state.pool, &email).await;
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }
    if record.attempts >= RESET_MAX_ATTEMPTS {
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }

    db::password_resets::increment_attempts(&state.pool, &email)
        .await
        .map_err(internal)?;

    if !verify_password(req.code.trim(), &record.code_hash) {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }

    let profile = db::profiles::find_login_by_email(&state.pool, &email)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?
        .profile;

    db::profiles::update_password(&state.pool, profile.id, &hashed, now)
        .await
        .map_err(internal)?;

    // Single use
    db::password_resets::delete(&state.pool, &email)
        .await
        .map_err(internal)?;

    tracing::info!(user_id = profile.id, "Password reset");
    Ok(Json(serde_json::json!({ "message": "Senha redefinida" })))
}
