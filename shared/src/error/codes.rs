//! Unified error codes for the Perkcard platform
//!
//! This module defines all error codes shared by the server and the web client.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Card errors
//! - 4xxx: Perk errors
//! - 5xxx: Redemption errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error code, serialized as a bare u16 so the web client can switch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Caller is not staff of the business owning the perk
    NotBusinessStaff = 2002,

    // ==================== 3xxx: Card ====================
    /// Caller holds no active membership card
    NoActiveCard = 3001,
    /// Card tier ranks below the perk's required tier
    InsufficientTier = 3002,
    /// Owner already holds an active card
    CardAlreadyActive = 3003,

    // ==================== 4xxx: Perk ====================
    /// Perk not found
    PerkNotFound = 4001,
    /// Perk is switched off or outside its activity window
    PerkInactive = 4002,
    /// Perk has reached its total or per-user redemption cap
    RedemptionLimitReached = 4003,

    // ==================== 5xxx: Redemption ====================
    /// No redemption matches the submitted code
    InvalidCode = 5001,
    /// Code was already consumed
    AlreadyRedeemed = 5002,
    /// Code is past its expiry
    CodeExpired = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Persisting a new redemption failed
    InsertFailed = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::NotBusinessStaff => "Only staff of the owning business may do this",

            // Card
            ErrorCode::NoActiveCard => "No active membership card",
            ErrorCode::InsufficientTier => "Card tier is too low for this perk",
            ErrorCode::CardAlreadyActive => "An active card already exists",

            // Perk
            ErrorCode::PerkNotFound => "Perk not found",
            ErrorCode::PerkInactive => "Perk is not currently available",
            ErrorCode::RedemptionLimitReached => "Perk redemption limit reached",

            // Redemption
            ErrorCode::InvalidCode => "Redemption code is invalid",
            ErrorCode::AlreadyRedeemed => "Redemption code was already used",
            ErrorCode::CodeExpired => "Redemption code has expired",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::InsertFailed => "Could not create redemption",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2002 => Ok(ErrorCode::NotBusinessStaff),

            // Card
            3001 => Ok(ErrorCode::NoActiveCard),
            3002 => Ok(ErrorCode::InsufficientTier),
            3003 => Ok(ErrorCode::CardAlreadyActive),

            // Perk
            4001 => Ok(ErrorCode::PerkNotFound),
            4002 => Ok(ErrorCode::PerkInactive),
            4003 => Ok(ErrorCode::RedemptionLimitReached),

            // Redemption
            5001 => Ok(ErrorCode::InvalidCode),
            5002 => Ok(ErrorCode::AlreadyRedeemed),
            5003 => Ok(ErrorCode::CodeExpired),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::InsertFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::NotBusinessStaff.code(), 2002);
        assert_eq!(ErrorCode::NoActiveCard.code(), 3001);
        assert_eq!(ErrorCode::InsufficientTier.code(), 3002);
        assert_eq!(ErrorCode::PerkNotFound.code(), 4001);
        assert_eq!(ErrorCode::PerkInactive.code(), 4002);
        assert_eq!(ErrorCode::InvalidCode.code(), 5001);
        assert_eq!(ErrorCode::AlreadyRedeemed.code(), 5002);
        assert_eq!(ErrorCode::CodeExpired.code(), 5003);
        assert_eq!(ErrorCode::InsertFailed.code(), 9003);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(9), Ok(ErrorCode::TooManyRequests));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4003), Ok(ErrorCode::RedemptionLimitReached));
        assert_eq!(ErrorCode::try_from(5002), Ok(ErrorCode::AlreadyRedeemed));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(2001), Err(InvalidErrorCode(2001)));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ErrorCode::CodeExpired).unwrap(), "5003");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("3002").unwrap();
        assert_eq!(code, ErrorCode::InsufficientTier);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::CodeExpired.message(), "Redemption code has expired");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
