//! perkcard-server: loyalty card perks and one-time redemption codes
//!
//! - Cardholders claim a card, browse perks and request short-lived codes
//! - Business staff validate and confirm codes at the counter

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod redemption;
pub mod state;
pub mod store;
