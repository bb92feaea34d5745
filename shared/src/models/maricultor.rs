//! Maricultor Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maricultor entity (association member tracked for mensalidades)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Maricultor {
    pub id: i64,
    /// Login account, when the member has self-service access
    pub user_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub community: Option<String>,
    /// What the member farms (ostras, mexilhões, vieiras, algas...)
    pub species: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub monthly_fee_amount: Option<Decimal>,
    pub association_date: Option<NaiveDate>,
    pub fee_exempt: bool,
    pub is_active: bool,
    pub show_on_map: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create maricultor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaricultorCreate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub community: Option<String>,
    pub species: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub monthly_fee_amount: Option<Decimal>,
    pub association_date: Option<NaiveDate>,
    #[serde(default)]
    pub fee_exempt: bool,
    #[serde(default = "default_true")]
    pub show_on_map: bool,
    /// When set, a login is created for the member with this password
    pub password: Option<String>,
}

/// Update maricultor payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaricultorUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub community: Option<String>,
    pub species: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub monthly_fee_amount: Option<Decimal>,
    pub association_date: Option<NaiveDate>,
    pub fee_exempt: Option<bool>,
    pub is_active: Option<bool>,
    pub show_on_map: Option<bool>,
}

/// Public map pin for a producer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProducerPin {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub community: Option<String>,
    pub species: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Ledger view of a member: only the columns the year grid needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LedgerMember {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub monthly_fee_amount: Option<Decimal>,
    pub association_date: Option<NaiveDate>,
    pub fee_exempt: bool,
}

fn default_true() -> bool {
    true
}
