//! Login identifiers
//!
//! Members log in with their phone number, staff usually with an email.
//! Phones are stored normalized (national digits only, no `55` country code)
//! so `(48) 99123-4567`, `+55 48 99123 4567` and `48991234567` are the same
//! account.

use crate::error::{AppError, ErrorCode};

/// Domain for addresses derived from phone numbers; never routable
pub const SYNTHETIC_EMAIL_DOMAIN: &str = "phone.maricultura.local";

/// Normalize a Brazilian phone number to its national digits.
///
/// Returns `None` for anything that does not reduce to 10 or 11 digits
/// (area code + 8/9 digit subscriber number).
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        12 | 13 if digits.starts_with("55") => &digits[2..],
        _ => digits.as_str(),
    };
    matches!(national.len(), 10 | 11).then(|| national.to_string())
}

/// Same as [`normalize_phone`] with an API error for the handler edge
pub fn require_phone(raw: &str) -> Result<String, AppError> {
    normalize_phone(raw)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidPhone).with_detail("phone", raw))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Phone(String),
}

impl LoginIdentifier {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::required("identifier"));
        }
        if is_synthetic_email(raw) {
            // Old-style login: the phone encoded as an address
            let local = raw.split('@').next().unwrap_or_default();
            require_phone(local).map(Self::Phone)
        } else if raw.contains('@') {
            Ok(Self::Email(raw.to_lowercase()))
        } else {
            require_phone(raw).map(Self::Phone)
        }
    }
}

/// Deterministic placeholder address for a member without email
pub fn synthetic_email(phone: &str) -> Option<String> {
    normalize_phone(phone).map(|digits| format!("{digits}@{SYNTHETIC_EMAIL_DOMAIN}"))
}

pub fn is_synthetic_email(email: &str) -> bool {
    email
        .trim()
        .to_ascii_lowercase()
        .ends_with(&format!("@{SYNTHETIC_EMAIL_DOMAIN}"))
}

/// Address that can actually receive mail
pub fn deliverable_email(email: Option<&str>) -> Option<&str> {
    email
        .map(str::trim)
        .filter(|e| e.contains('@') && !is_synthetic_email(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_formats_converge() {
        let expected = Some("48991234567".to_string());
        assert_eq!(normalize_phone("(48) 99123-4567"), expected);
        assert_eq!(normalize_phone("+55 48 99123 4567"), expected);
        assert_eq!(normalize_phone("5548991234567"), expected);
        assert_eq!(normalize_phone("48991234567"), expected);
    }

    #[test]
    fn test_landline_and_short_numbers() {
        assert_eq!(normalize_phone("48 3222-1234"), Some("4832221234".to_string()));
        assert_eq!(normalize_phone("99123-4567"), None);
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("12345678901234"), None);
    }

    #[test]
    fn test_identifier_parse() {
        assert_eq!(
            LoginIdentifier::parse(" Ana@Example.org ").unwrap(),
            LoginIdentifier::Email("ana@example.org".to_string())
        );
        assert_eq!(
            LoginIdentifier::parse("(48) 99123-4567").unwrap(),
            LoginIdentifier::Phone("48991234567".to_string())
        );
        assert_eq!(
            LoginIdentifier::parse("48991234567@phone.maricultura.local").unwrap(),
            LoginIdentifier::Phone("48991234567".to_string())
        );
        assert_eq!(
            LoginIdentifier::parse("123").unwrap_err().code,
            ErrorCode::InvalidPhone
        );
        assert_eq!(
            LoginIdentifier::parse("  ").unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn test_synthetic_email() {
        let email = synthetic_email("+55 (48) 99123-4567").unwrap();
        assert_eq!(email, "48991234567@phone.maricultura.local");
        assert!(is_synthetic_email(&email));
        assert!(!is_synthetic_email("ana@example.org"));
        assert_eq!(synthetic_email("123"), None);
    }

    #[test]
    fn test_deliverable_email() {
        assert_eq!(deliverable_email(Some("ana@example.org")), Some("ana@example.org"));
        assert_eq!(
            deliverable_email(Some("48991234567@phone.maricultura.local")),
            None
        );
        assert_eq!(deliverable_email(Some("  ")), None);
        assert_eq!(deliverable_email(None), None);
    }
}
