//! Error codes shared by the Perkcard server and web client
//!
//! - [`ErrorCode`]: numeric codes, grouped by range
//! - [`ErrorCategory`]: the range a code falls in
//! - [`AppError`] / [`ErrorBody`]: error value and its JSON body
//!
//! # Code ranges
//!
//! - 0xxx: General
//! - 1xxx: Authentication
//! - 2xxx: Permission
//! - 3xxx: Card
//! - 4xxx: Perk
//! - 5xxx: Redemption
//! - 9xxx: System
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::validation("perk id must be an integer").with_detail("field", "id");
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorBody};
