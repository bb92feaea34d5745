//! Back-office API, split into sub-modules by domain
//!
//! Every route here sits behind `session_auth` + `require_admin`.

pub mod about;
pub mod downloads;
pub mod events;
pub mod maricultores;
pub mod news;
pub mod projects;
pub mod push;
pub mod users;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::identity::is_synthetic_email;

use crate::error::ServiceError;
use crate::util::non_blank;

pub use super::{ApiResult, JsonBody, internal};

/// Trim and lowercase an optional email. Placeholder phone addresses are dropped.
pub fn normalize_email(raw: Option<&str>) -> AppResult<Option<String>> {
    let Some(email) = non_blank(raw).map(|e| e.to_lowercase()) else {
        return Ok(None);
    };
    if is_synthetic_email(&email) {
        return Ok(None);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(Some(email)),
        _ => Err(AppError::validation("E-mail inválido").with_detail("email", email)),
    }
}

/// Map a unique violation on `profiles` to the matching conflict code
pub fn profile_conflict(e: sqlx::Error) -> ServiceError {
    let code = match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            if db.constraint().is_some_and(|c| c.contains("phone")) {
                ErrorCode::PhoneAlreadyUsed
            } else {
                ErrorCode::EmailAlreadyUsed
            }
        }
        _ => return ServiceError::from(e),
    };
    ServiceError::App(AppError::new(code))
}

/// Map a `*_NotFound` miss for a delete or update
pub fn found<T>(value: Option<T>, code: ErrorCode) -> AppResult<T> {
    value.ok_or_else(|| AppError::new(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(Some(" Ana@Example.ORG ")).unwrap(),
            Some("ana@example.org".to_string())
        );
        assert_eq!(normalize_email(Some("  ")).unwrap(), None);
        assert_eq!(normalize_email(None).unwrap(), None);
        assert_eq!(
            normalize_email(Some("48991234567@phone.maricultura.local")).unwrap(),
            None
        );
        for bad in ["ana", "@example.org", "ana@localhost"] {
            assert_eq!(
                normalize_email(Some(bad)).unwrap_err().code,
                ErrorCode::ValidationFailed
            );
        }
    }

    #[test]
    fn test_profile_conflict_passes_other_errors() {
        let err: AppError = profile_conflict(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
