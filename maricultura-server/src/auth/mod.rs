//! Session authentication, admin gate and rate limiting

pub mod admin;
pub mod rate_limit;
pub mod session;

pub use admin::require_admin;
pub use session::{SessionIdentity, session_auth};
