//! Service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer `AppError`, so multi-step operations can use `?` throughout and
//! be converted once at the handler edge.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error (logged, surfaced as 500 with the driver message)
    Db(BoxError),
    /// Business-rule error (passed through to the client)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::database(db_err.to_string())
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a unique-constraint violation to a conflict, anything else to a DB error
pub fn unique_violation(e: sqlx::Error, code: ErrorCode) -> ServiceError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => ServiceError::App(AppError::new(code)),
        _ => ServiceError::from(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_keeps_driver_message() {
        let err: AppError = ServiceError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, sqlx::Error::PoolTimedOut.to_string());
        assert_eq!(err.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: AppError = ServiceError::from(AppError::new(ErrorCode::PaymentNotFound)).into();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_non_unique_error_is_not_conflict() {
        let err = unique_violation(sqlx::Error::RowNotFound, ErrorCode::NewsSlugExists);
        assert!(matches!(err, ServiceError::Db(_)));
    }
}
