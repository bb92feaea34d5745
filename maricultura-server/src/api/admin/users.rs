//! Login account management (admins and member logins)

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::identity::require_phone;
use shared::models::{Profile, ProfileCreate, ProfileUpdate, Role};
use shared::util::now_millis;

use crate::auth::SessionIdentity;
use crate::db;
use crate::db::profiles::NewProfile;
use crate::state::AppState;
use crate::util::{new_password_hash, non_blank};

use super::{ApiResult, JsonBody, found, internal, normalize_email, profile_conflict};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<Role>,
}

fn normalize_profile_create(mut data: ProfileCreate) -> AppResult<ProfileCreate> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err(AppError::required("name"));
    }
    data.email = normalize_email(data.email.as_deref())?;
    data.phone = non_blank(data.phone.as_deref())
        .map(|p| require_phone(&p))
        .transpose()?;
    if data.email.is_none() && data.phone.is_none() {
        return Err(AppError::validation("Informe e-mail ou telefone"));
    }
    Ok(data)
}

fn normalize_profile_update(mut data: ProfileUpdate) -> AppResult<ProfileUpdate> {
    if let Some(name) = &data.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::required("name"));
        }
        data.name = Some(name.to_string());
    }
    data.email = normalize_email(data.email.as_deref())?;
    data.phone = non_blank(data.phone.as_deref())
        .map(|p| require_phone(&p))
        .transpose()?;
    Ok(data)
}

/// GET /api/admin/users?role=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Profile>> {
    let users = db::profiles::list(&state.pool, query.role.map(|r| r.as_str()))
        .await
        .map_err(internal)?;
    Ok(Json(users))
}

/// POST /api/admin/users
pub async fn create(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<ProfileCreate>,
) -> ApiResult<Profile> {
    let data = normalize_profile_create(data)?;
    let hashed = new_password_hash(&data.password)?;

    let user = db::profiles::create(
        &state.pool,
        &NewProfile {
            name: &data.name,
            email: data.email.as_deref(),
            phone: data.phone.as_deref(),
            hashed_password: &hashed,
            role: data.role.as_str(),
        },
        now_millis(),
    )
    .await
    .map_err(|e| AppError::from(profile_conflict(e)))?;

    tracing::info!(user_id = user.id, role = %data.role, "User created");
    Ok(Json(user))
}

/// PUT /api/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(id): Path<i64>,
    JsonBody(data): JsonBody<ProfileUpdate>,
) -> ApiResult<Profile> {
    let data = normalize_profile_update(data)?;

    // An admin cannot lock themselves out
    if id == identity.user_id
        && (data.is_active == Some(false) || data.role.is_some_and(|r| r != Role::Admin))
    {
        return Err(AppError::permission_denied(
            "Não é possível desativar ou rebaixar a própria conta",
        ));
    }

    let user = db::profiles::update(&state.pool, id, &data, now_millis())
        .await
        .map_err(|e| AppError::from(profile_conflict(e)))?;
    let user = found(user, ErrorCode::UserNotFound)?;

    tracing::info!(user_id = id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/admin/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if id == identity.user_id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }
    let deleted = db::profiles::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}
