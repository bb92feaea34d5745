//! Database access layer
//!
//! Free functions over `PgPool` (or any `PgExecutor` when a caller needs a
//! transaction). Timestamps are Unix millis supplied by the caller.

pub mod audit;
pub mod content;
pub mod maricultores;
pub mod password_resets;
pub mod payments;
pub mod profiles;
pub mod push_subscriptions;
