//! Data models
//!
//! Shared between the server and the admin frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), timestamps are Unix millis.

pub mod content;
pub mod maricultor;
pub mod payment;
pub mod profile;
pub mod push;

// Re-exports
pub use content::*;
pub use maricultor::*;
pub use payment::*;
pub use profile::*;
pub use push::*;
