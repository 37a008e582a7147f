//! Shared types for the Perkcard platform
//!
//! Error codes, response envelopes and the card/perk/redemption models used by
//! the server and mirrored by the web client.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
