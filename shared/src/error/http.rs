//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::UserNotFound
            | Self::MaricultorNotFound
            | Self::PaymentNotFound
            | Self::NewsNotFound
            | Self::EventNotFound
            | Self::ProjectNotFound
            | Self::DownloadNotFound
            | Self::AboutSectionNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::EmailAlreadyUsed
            | Self::PhoneAlreadyUsed
            | Self::MaricultorHasLogin
            | Self::NewsSlugExists
            | Self::AboutSectionKeyExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled
            | Self::CronUnauthorized => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::CannotDeleteSelf
            | Self::MaricultorNotLinked => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyRequests | Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable
            Self::PushNotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::EmailDeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
