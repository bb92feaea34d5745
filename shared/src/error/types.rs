//! Error types and API response structures

use super::codes::ErrorCode;
use axum::extract::rejection::JsonRejection;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error type every handler returns, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (offending field, resource id)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a required-field error naming the missing field
    pub fn required(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} é obrigatório"))
            .with_detail("field", field)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error carrying the driver message
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

/// Error body returned for every failed request
///
/// - `code`: numeric [`ErrorCode`]
/// - `message`: human-readable message
/// - `details`: optional structured context (offending field, limits)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

/// Body rejections become 400s in the error envelope
///
/// Shape errors (wrong type, missing field, bad syntax) are validation
/// failures; a wrong content type or unreadable body is an invalid request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::validation(rejection.body_text())
            }
            _ => Self::invalid_request(rejection.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::PaymentNotFound);
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
        assert_eq!(err.message, "Pagamento não encontrado");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Campos obrigatórios ausentes")
            .with_detail("field", "month")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "month");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_required_names_field() {
        let err = AppError::required("maricultor_id");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("maricultor_id"));
        assert_eq!(err.details.unwrap().get("field").unwrap(), "maricultor_id");
    }

    #[test]
    fn test_database_error_passes_driver_message() {
        let err = AppError::database("duplicate key value violates unique constraint");
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message,
            "duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::NotFound, "Evento não encontrado");
        assert_eq!(format!("{}", err), "Evento não encontrado");
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::new(ErrorCode::PaymentInvalidMonth).with_detail("month", 13);
        let json = serde_json::to_value(ApiResponse::error(&err)).unwrap();

        assert_eq!(json["code"], 5002);
        assert_eq!(json["message"], "Mês deve estar entre 1 e 12");
        assert_eq!(json["details"]["month"], 13);

        let json = serde_json::to_string(&ApiResponse::error(&AppError::not_authenticated())).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_json_rejection_is_bad_request() {
        #[derive(Debug, serde::Deserialize)]
        struct Body {
            #[allow(dead_code)]
            month: i32,
        }

        let rejection = axum::Json::<Body>::from_bytes(br#"{"month":"3"}"#).unwrap_err();
        let err = AppError::from(rejection);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("month"));

        let rejection = axum::Json::<Body>::from_bytes(b"{").unwrap_err();
        assert_eq!(AppError::from(rejection).code, ErrorCode::ValidationFailed);
    }
}
