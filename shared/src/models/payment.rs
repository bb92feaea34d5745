//! Monthly payment (mensalidade) Model

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How a mensalidade was settled
///
/// Wire values are the lowercase Portuguese names. Unknown values never fail
/// to parse: they are coerced to [`PaymentMethod::Outros`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Dinheiro,
    Pix,
    Peixe,
    Materiais,
    Outros,
    /// Exempted for the month; contributes nothing to revenue
    Isento,
}

impl PaymentMethod {
    /// Every method, in display order
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Dinheiro,
        PaymentMethod::Pix,
        PaymentMethod::Peixe,
        PaymentMethod::Materiais,
        PaymentMethod::Outros,
        PaymentMethod::Isento,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dinheiro => "dinheiro",
            Self::Pix => "pix",
            Self::Peixe => "peixe",
            Self::Materiais => "materiais",
            Self::Outros => "outros",
            Self::Isento => "isento",
        }
    }

    /// Parse a wire value, coercing anything unrecognized to `Outros`
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dinheiro" => Self::Dinheiro,
            "pix" => Self::Pix,
            "peixe" => Self::Peixe,
            "materiais" => Self::Materiais,
            "isento" => Self::Isento,
            _ => Self::Outros,
        }
    }

    pub fn is_exempt(&self) -> bool {
        matches!(self, Self::Isento)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Outros
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(PaymentMethod::parse_lenient)
            .unwrap_or_default())
    }
}

#[cfg(feature = "db")]
mod db {
    use super::PaymentMethod;
    use sqlx::encode::IsNull;
    use sqlx::error::BoxDynError;
    use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
    use sqlx::{Decode, Encode, Postgres, Type};

    impl Type<Postgres> for PaymentMethod {
        fn type_info() -> PgTypeInfo {
            <String as Type<Postgres>>::type_info()
        }

        fn compatible(ty: &PgTypeInfo) -> bool {
            <String as Type<Postgres>>::compatible(ty)
        }
    }

    impl<'r> Decode<'r, Postgres> for PaymentMethod {
        fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
            let raw = <&str as Decode<Postgres>>::decode(value)?;
            Ok(PaymentMethod::parse_lenient(raw))
        }
    }

    impl<'q> Encode<'q, Postgres> for PaymentMethod {
        fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
            <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
        }
    }
}

/// One row per (maricultor, year, month)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MonthlyPayment {
    pub id: i64,
    pub maricultor_id: i64,
    pub year: i32,
    /// 1 = January .. 12 = December
    pub month: i32,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub amount: Option<Decimal>,
    pub payment_method: PaymentMethod,
    /// Unix millis; null for exemptions unless explicitly supplied
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
    /// Profile id of the admin who recorded it
    pub marked_by: Option<i64>,
    pub updated_at: i64,
}

/// Record payment payload (`POST /api/admin/payments`)
///
/// Required fields are optional here so that a missing field becomes a 400
/// with a readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub maricultor_id: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
}

/// Partial update payload (`PUT /api/admin/payments/{id}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentUpdate {
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub paid_at: Option<i64>,
    pub notes: Option<String>,
}
