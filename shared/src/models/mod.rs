//! Data models
//!
//! Shared between perkcard-server and the web client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Timestamps are Unix milliseconds.

pub mod card;
pub mod perk;
pub mod redemption;

// Re-exports
pub use card::*;
pub use perk::*;
pub use redemption::*;
