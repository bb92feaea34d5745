//! Unified error codes for the maricultura back office
//!
//! This module defines all error codes returned by the HTTP API.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Member (maricultor) errors
//! - 5xxx: Payment (mensalidade) errors
//! - 6xxx: Content errors
//! - 7xxx: Notification errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin frontend can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (identifier/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot delete own account
    CannotDeleteSelf = 2006,

    // ==================== 3xxx: Account ====================
    /// User account not found
    UserNotFound = 3001,
    /// Email is already used by another account
    EmailAlreadyUsed = 3002,
    /// Phone is already used by another account
    PhoneAlreadyUsed = 3003,
    /// Phone number is not valid
    InvalidPhone = 3004,
    /// Verification code expired
    VerificationCodeExpired = 3013,
    /// Verification code invalid
    VerificationCodeInvalid = 3014,
    /// Too many verification attempts
    TooManyAttempts = 3015,
    /// Password too short
    PasswordTooShort = 3018,

    // ==================== 4xxx: Member ====================
    /// Maricultor not found
    MaricultorNotFound = 4001,
    /// Session user is not linked to a maricultor
    MaricultorNotLinked = 4003,
    /// Maricultor already has a login
    MaricultorHasLogin = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment record not found
    PaymentNotFound = 5001,
    /// Month outside 1..=12
    PaymentInvalidMonth = 5002,
    /// Year outside 2000..=2100
    PaymentInvalidYear = 5003,

    // ==================== 6xxx: Content ====================
    /// News article not found
    NewsNotFound = 6001,
    /// News slug already exists
    NewsSlugExists = 6002,
    /// Event not found
    EventNotFound = 6101,
    /// Project not found
    ProjectNotFound = 6201,
    /// Download not found
    DownloadNotFound = 6301,
    /// About section not found
    AboutSectionNotFound = 6401,
    /// About section key already exists
    AboutSectionKeyExists = 6402,

    // ==================== 7xxx: Notification ====================
    /// Push subscription payload is invalid
    PushSubscriptionInvalid = 7001,
    /// Push notifications are not configured
    PushNotConfigured = 7002,
    /// Cron secret missing or wrong
    CronUnauthorized = 7101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Email delivery failed
    EmailDeliveryFailed = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default (Portuguese, user-facing) message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Dados inválidos",
            ErrorCode::NotFound => "Registro não encontrado",
            ErrorCode::InvalidRequest => "Requisição inválida",
            ErrorCode::RequiredField => "Campo obrigatório ausente",
            ErrorCode::ValueOutOfRange => "Valor fora do intervalo permitido",
            ErrorCode::TooManyRequests => "Muitas tentativas, tente novamente mais tarde",

            // Auth
            ErrorCode::NotAuthenticated => "Não autenticado",
            ErrorCode::InvalidCredentials => "Credenciais inválidas",
            ErrorCode::TokenExpired => "Sessão expirada",
            ErrorCode::TokenInvalid => "Sessão inválida",
            ErrorCode::AccountDisabled => "Conta desativada",

            // Permission
            ErrorCode::PermissionDenied => "Acesso negado",
            ErrorCode::AdminRequired => "Acesso restrito a administradores ativos",
            ErrorCode::CannotDeleteSelf => "Não é possível excluir a própria conta",

            // Account
            ErrorCode::UserNotFound => "Usuário não encontrado",
            ErrorCode::EmailAlreadyUsed => "E-mail já cadastrado",
            ErrorCode::PhoneAlreadyUsed => "Telefone já cadastrado",
            ErrorCode::InvalidPhone => "Telefone inválido",
            ErrorCode::VerificationCodeExpired => "Código expirado",
            ErrorCode::VerificationCodeInvalid => "Código inválido",
            ErrorCode::TooManyAttempts => "Número máximo de tentativas excedido",
            ErrorCode::PasswordTooShort => "A senha deve ter pelo menos 8 caracteres",

            // Member
            ErrorCode::MaricultorNotFound => "Maricultor não encontrado",
            ErrorCode::MaricultorNotLinked => "Usuário não vinculado a um maricultor",
            ErrorCode::MaricultorHasLogin => "Maricultor já possui acesso",

            // Payment
            ErrorCode::PaymentNotFound => "Pagamento não encontrado",
            ErrorCode::PaymentInvalidMonth => "Mês deve estar entre 1 e 12",
            ErrorCode::PaymentInvalidYear => "Ano deve estar entre 2000 e 2100",

            // Content
            ErrorCode::NewsNotFound => "Notícia não encontrada",
            ErrorCode::NewsSlugExists => "Já existe uma notícia com este endereço",
            ErrorCode::EventNotFound => "Evento não encontrado",
            ErrorCode::ProjectNotFound => "Projeto não encontrado",
            ErrorCode::DownloadNotFound => "Arquivo não encontrado",
            ErrorCode::AboutSectionNotFound => "Seção não encontrada",
            ErrorCode::AboutSectionKeyExists => "Já existe uma seção com esta chave",

            // Notification
            ErrorCode::PushSubscriptionInvalid => "Inscrição de notificação inválida",
            ErrorCode::PushNotConfigured => "Notificações não configuradas",
            ErrorCode::CronUnauthorized => "Chamada agendada não autorizada",

            // System
            ErrorCode::InternalError => "Erro interno do servidor",
            ErrorCode::DatabaseError => "Erro de banco de dados",
            ErrorCode::EmailDeliveryFailed => "Falha ao enviar e-mail",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::CannotDeleteSelf),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyUsed),
            3003 => Ok(ErrorCode::PhoneAlreadyUsed),
            3004 => Ok(ErrorCode::InvalidPhone),
            3013 => Ok(ErrorCode::VerificationCodeExpired),
            3014 => Ok(ErrorCode::VerificationCodeInvalid),
            3015 => Ok(ErrorCode::TooManyAttempts),
            3018 => Ok(ErrorCode::PasswordTooShort),

            // Member
            4001 => Ok(ErrorCode::MaricultorNotFound),
            4003 => Ok(ErrorCode::MaricultorNotLinked),
            4004 => Ok(ErrorCode::MaricultorHasLogin),

            // Payment
            5001 => Ok(ErrorCode::PaymentNotFound),
            5002 => Ok(ErrorCode::PaymentInvalidMonth),
            5003 => Ok(ErrorCode::PaymentInvalidYear),

            // Content
            6001 => Ok(ErrorCode::NewsNotFound),
            6002 => Ok(ErrorCode::NewsSlugExists),
            6101 => Ok(ErrorCode::EventNotFound),
            6201 => Ok(ErrorCode::ProjectNotFound),
            6301 => Ok(ErrorCode::DownloadNotFound),
            6401 => Ok(ErrorCode::AboutSectionNotFound),
            6402 => Ok(ErrorCode::AboutSectionKeyExists),

            // Notification
            7001 => Ok(ErrorCode::PushSubscriptionInvalid),
            7002 => Ok(ErrorCode::PushNotConfigured),
            7101 => Ok(ErrorCode::CronUnauthorized),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9006 => Ok(ErrorCode::EmailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::PasswordTooShort.code(), 3018);
        assert_eq!(ErrorCode::MaricultorNotFound.code(), 4001);
        assert_eq!(ErrorCode::PaymentInvalidMonth.code(), 5002);
        assert_eq!(ErrorCode::PaymentInvalidYear.code(), 5003);
        assert_eq!(ErrorCode::NewsNotFound.code(), 6001);
        assert_eq!(ErrorCode::CronUnauthorized.code(), 7101);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_roundtrips_every_payment_code() {
        for code in [
            ErrorCode::PaymentNotFound,
            ErrorCode::PaymentInvalidMonth,
            ErrorCode::PaymentInvalidYear,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_value() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::PaymentInvalidMonth).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(code, ErrorCode::NotAuthenticated);
    }
}
