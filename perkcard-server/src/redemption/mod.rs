//! Redemption codes: issue, validate, confirm
//!
//! A cardholder asks for a code for one perk; staff of the perk's business
//! inspect it and consume it. Codes live for [`CODE_TTL_MS`] and move from
//! `pending` to `redeemed` at most once.

pub mod code;
pub mod eligibility;
mod error;
mod service;

pub use code::CODE_TTL_MS;
pub use error::RedeemError;
pub use service::{Issued, RedemptionService};
