//! Profile (login account) Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Association staff, manages content and the ledger
    Admin,
    /// Member with self-service access to their own data
    Maricultor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Maricultor => "maricultor",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "maricultor" => Some(Self::Maricultor),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile as returned by the API (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Profile {
    pub fn role(&self) -> Option<Role> {
        Role::from_db(&self.role)
    }

    /// Active admin: the only kind of caller allowed on management endpoints
    pub fn is_active_admin(&self) -> bool {
        self.is_active && self.role() == Some(Role::Admin)
    }
}

/// Create user payload (admin back office)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

fn default_role() -> Role {
    Role::Admin
}
