//! Shared types for the maricultura back office
//!
//! Error codes and response envelope, wire/domain models, the pure
//! mensalidade ledger logic and phone login helpers.

pub mod error;
pub mod identity;
pub mod ledger;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
