//! Admin gate for management routes

use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, Role};

use crate::db;
use crate::state::AppState;

use super::SessionIdentity;

/// Check a loaded profile against the admin rule
pub fn ensure_active_admin(profile: &Profile) -> Result<(), AppError> {
    if !profile.is_active {
        return Err(AppError::permission_denied("Conta desativada"));
    }
    if !profile.is_active_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(())
}

/// Middleware (after `session_auth`): the caller's profile must be an active admin.
///
/// A non-admin role claim is refused outright. An admin claim is not trusted:
/// the profile is reloaded so a deactivation or demotion takes effect immediately.
pub async fn require_admin(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if identity.role != Role::Admin {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let profile = db::profiles::find_by_id(&state.pool, identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error loading admin profile: {e}");
            AppError::database(e.to_string())
        })?
        .ok_or_else(AppError::not_authenticated)?;

    ensure_active_admin(&profile)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: &str, is_active: bool) -> Profile {
        Profile {
            id: 1,
            name: "Admin".to_string(),
            email: Some("admin@example.org".to_string()),
            phone: None,
            role: role.to_string(),
            is_active,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_active_admin_allowed() {
        assert!(ensure_active_admin(&profile("admin", true)).is_ok());
    }

    #[test]
    fn test_inactive_admin_forbidden() {
        let err = ensure_active_admin(&profile("admin", false)).unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_member_forbidden() {
        let err = ensure_active_admin(&profile("maricultor", true)).unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(err.http_status(), http::StatusCode::FORBIDDEN);
    }
}
