//! Member (maricultor) management
//!
//! Members are never hard-deleted: `DELETE` deactivates. A member may get a
//! login (role `maricultor`, phone-native) at creation or later.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::identity::{deliverable_email, require_phone};
use shared::models::{Maricultor, MaricultorCreate, MaricultorUpdate, ProfileUpdate, Role};
use shared::util::now_millis;
use sqlx::{Acquire, Postgres};

use crate::db;
use crate::db::profiles::NewProfile;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::util::{new_password_hash, non_blank};

use super::{ApiResult, JsonBody, internal, normalize_email, profile_conflict};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

fn check_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<()> {
    if latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        return Err(AppError::new(ErrorCode::ValueOutOfRange).with_detail("field", "latitude"));
    }
    if longitude.is_some_and(|lng| !(-180.0..=180.0).contains(&lng)) {
        return Err(AppError::new(ErrorCode::ValueOutOfRange).with_detail("field", "longitude"));
    }
    Ok(())
}

fn check_fee(amount: Option<Decimal>) -> AppResult<()> {
    if amount.is_some_and(|a| a.is_sign_negative()) {
        return Err(AppError::new(ErrorCode::ValueOutOfRange)
            .with_detail("field", "monthly_fee_amount"));
    }
    Ok(())
}

/// Trim text, normalize phone/email and range-check a create payload
pub fn normalize_create(mut data: MaricultorCreate) -> AppResult<MaricultorCreate> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err(AppError::required("name"));
    }
    data.phone = non_blank(data.phone.as_deref())
        .map(|p| require_phone(&p))
        .transpose()?;
    data.email = normalize_email(data.email.as_deref())?;
    data.city = non_blank(data.city.as_deref());
    data.community = non_blank(data.community.as_deref());
    data.species = non_blank(data.species.as_deref());
    check_coordinates(data.latitude, data.longitude)?;
    check_fee(data.monthly_fee_amount)?;
    Ok(data)
}

pub fn normalize_update(mut data: MaricultorUpdate) -> AppResult<MaricultorUpdate> {
    if let Some(name) = &data.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::required("name"));
        }
        data.name = Some(name.to_string());
    }
    data.phone = non_blank(data.phone.as_deref())
        .map(|p| require_phone(&p))
        .transpose()?;
    data.email = normalize_email(data.email.as_deref())?;
    check_coordinates(data.latitude, data.longitude)?;
    check_fee(data.monthly_fee_amount)?;
    Ok(data)
}

/// Identifier the member types at login
fn login_hint(member: &Maricultor) -> Option<&str> {
    member.phone.as_deref().or(member.email.as_deref())
}

/// GET /api/admin/maricultores?active=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Maricultor>> {
    let members = db::maricultores::list(&state.pool, query.active)
        .await
        .map_err(internal)?;
    Ok(Json(members))
}

/// GET /api/admin/maricultores/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Maricultor> {
    find_member(&state, id).await.map(Json)
}

async fn find_member(state: &AppState, id: i64) -> AppResult<Maricultor> {
    db::maricultores::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::MaricultorNotFound))
}

/// Insert the member and, when a password is given, its login, atomically
async fn create_with_login(
    state: &AppState,
    data: &MaricultorCreate,
    password_hash: Option<&str>,
    now: i64,
) -> ServiceResult<Maricultor> {
    let mut tx = state.pool.begin().await?;

    let user_id = match password_hash {
        Some(hashed_password) => {
            let profile = db::profiles::create(
                &mut *tx,
                &NewProfile {
                    name: &data.name,
                    email: data.email.as_deref(),
                    phone: data.phone.as_deref(),
                    hashed_password,
                    role: Role::Maricultor.as_str(),
                },
                now,
            )
            .await
            .map_err(profile_conflict)?;
            Some(profile.id)
        }
        None => None,
    };

    let member = db::maricultores::create(&mut *tx, data, user_id, now).await?;
    tx.commit().await?;
    Ok(member)
}

/// POST /api/admin/maricultores
pub async fn create(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<MaricultorCreate>,
) -> ApiResult<Maricultor> {
    let data = normalize_create(data)?;
    let password = data.password.clone();

    let password_hash = match password.as_deref() {
        Some(password) => {
            if data.phone.is_none() && data.email.is_none() {
                return Err(AppError::validation(
                    "Telefone ou e-mail é obrigatório para criar o acesso",
                ));
            }
            Some(new_password_hash(password)?)
        }
        None => None,
    };

    let now = now_millis();
    let member = create_with_login(&state, &data, password_hash.as_deref(), now).await?;
    tracing::info!(maricultor_id = member.id, has_login = member.user_id.is_some(), "Maricultor created");

    if let Some(password) = password.as_deref() {
        send_welcome(&state, &member, password).await;
    }
    Ok(Json(member))
}

/// Update the member and keep its login's name/phone/email in step, atomically
async fn update_with_login(
    conn: impl Acquire<'_, Database = Postgres>,
    current: &Maricultor,
    data: &MaricultorUpdate,
    now: i64,
) -> ServiceResult<Option<Maricultor>> {
    let mut tx = conn.begin().await?;

    if let Some(user_id) = current.user_id
        && (data.name.is_some() || data.phone.is_some() || data.email.is_some())
    {
        let sync = ProfileUpdate {
            name: data.name.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            ..Default::default()
        };
        db::profiles::update(&mut *tx, user_id, &sync, now)
            .await
            .map_err(profile_conflict)?;
    }

    let member = db::maricultores::update(&mut *tx, current.id, data, now).await?;
    tx.commit().await?;
    Ok(member)
}

/// PUT /api/admin/maricultores/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(data): JsonBody<MaricultorUpdate>,
) -> ApiResult<Maricultor> {
    let data = normalize_update(data)?;
    let current = find_member(&state, id).await?;

    let member = update_with_login(&state.pool, &current, &data, now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MaricultorNotFound))?;

    tracing::info!(maricultor_id = id, "Maricultor updated");
    Ok(Json(member))
}

/// DELETE /api/admin/maricultores/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let found = db::maricultores::deactivate(&state.pool, id, now_millis())
        .await
        .map_err(internal)?;
    if !found {
        return Err(AppError::new(ErrorCode::MaricultorNotFound));
    }
    tracing::info!(maricultor_id = id, "Maricultor deactivated");
    Ok(Json(serde_json::json!({ "id": id, "is_active": false })))
}

/// POST /api/admin/maricultores/{id}/access: create a login for an existing member
pub async fn grant_access(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<PasswordRequest>,
) -> ApiResult<Maricultor> {
    let member = find_member(&state, id).await?;
    if member.user_id.is_some() {
        return Err(AppError::new(ErrorCode::MaricultorHasLogin));
    }
    if member.phone.is_none() && member.email.is_none() {
        return Err(AppError::validation(
            "Telefone ou e-mail é obrigatório para criar o acesso",
        ));
    }
    let hashed = new_password_hash(&req.password)?;
    let now = now_millis();

    let linked: ServiceResult<()> = async {
        let mut tx = state.pool.begin().await?;
        let profile = db::profiles::create(
            &mut *tx,
            &NewProfile {
                name: &member.name,
                email: member.email.as_deref(),
                phone: member.phone.as_deref(),
                hashed_password: &hashed,
                role: Role::Maricultor.as_str(),
            },
            now,
        )
        .await
        .map_err(profile_conflict)?;
        db::maricultores::link_user(&mut *tx, id, profile.id, now).await?;
        tx.commit().await?;
        Ok(())
    }
    .await;
    linked?;

    let member = find_member(&state, id).await?;
    tracing::info!(maricultor_id = id, "Maricultor login created");
    send_welcome(&state, &member, &req.password).await;
    Ok(Json(member))
}

/// POST /api/admin/maricultores/{id}/password: set a new password for the member's login
pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<PasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let member = find_member(&state, id).await?;
    let user_id = member
        .user_id
        .ok_or_else(|| AppError::new(ErrorCode::MaricultorNotLinked))?;

    let hashed = new_password_hash(&req.password)?;
    db::profiles::update_password(&state.pool, user_id, &hashed, now_millis())
        .await
        .map_err(internal)?;

    tracing::info!(maricultor_id = id, "Maricultor password reset by admin");
    Ok(Json(serde_json::json!({ "message": "Senha alterada" })))
}

async fn send_welcome(state: &AppState, member: &Maricultor, password: &str) {
    let (Some(to), Some(login)) = (deliverable_email(member.email.as_deref()), login_hint(member))
    else {
        return;
    };
    if let Err(e) = state.email.send_welcome(to, &member.name, login, password).await {
        tracing::warn!(maricultor_id = member.id, "Welcome email not sent: {e}");
    }
}
