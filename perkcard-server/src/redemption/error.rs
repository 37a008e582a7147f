//! Redemption outcomes that are not success
//!
//! Every variant is an expected, user-facing result. Rendered over HTTP as
//! `{ "ok": false, "error": <kind>, "code": <u16>, "message": <text> }`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shared::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedeemError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("perk not found")]
    PerkNotFound,
    #[error("perk is not active")]
    PerkInactive,
    #[error("no active membership card")]
    NoActiveCard,
    #[error("card tier too low")]
    InsufficientTier,
    #[error("redemption limit reached")]
    RedemptionLimitReached,
    #[error("caller is not staff of the owning business")]
    NotBusinessStaff,
    #[error("invalid code")]
    InvalidCode,
    #[error("code already redeemed")]
    AlreadyRedeemed,
    #[error("code expired")]
    Expired,
    #[error("could not store redemption")]
    InsertFailed,
    #[error("internal error")]
    Internal,
}

impl RedeemError {
    /// Stable snake_case identifier the client maps to a message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::PerkNotFound => "perk_not_found",
            Self::PerkInactive => "perk_inactive",
            Self::NoActiveCard => "no_active_card",
            Self::InsufficientTier => "insufficient_tier",
            Self::RedemptionLimitReached => "redemption_limit_reached",
            Self::NotBusinessStaff => "not_business_staff",
            Self::InvalidCode => "invalid_code",
            Self::AlreadyRedeemed => "already_redeemed",
            Self::Expired => "expired",
            Self::InsertFailed => "insert_failed",
            Self::Internal => "internal_error",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotAuthenticated => ErrorCode::NotAuthenticated,
            Self::PerkNotFound => ErrorCode::PerkNotFound,
            Self::PerkInactive => ErrorCode::PerkInactive,
            Self::NoActiveCard => ErrorCode::NoActiveCard,
            Self::InsufficientTier => ErrorCode::InsufficientTier,
            Self::RedemptionLimitReached => ErrorCode::RedemptionLimitReached,
            Self::NotBusinessStaff => ErrorCode::NotBusinessStaff,
            Self::InvalidCode => ErrorCode::InvalidCode,
            Self::AlreadyRedeemed => ErrorCode::AlreadyRedeemed,
            Self::Expired => ErrorCode::CodeExpired,
            Self::InsertFailed => ErrorCode::InsertFailed,
            Self::Internal => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for RedeemError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = json!({
            "ok": false,
            "error": self.kind(),
            "code": code.code(),
            "message": code.message(),
        });
        (code.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_kinds_are_distinct() {
        let all = [
            RedeemError::NotAuthenticated,
            RedeemError::PerkNotFound,
            RedeemError::PerkInactive,
            RedeemError::NoActiveCard,
            RedeemError::InsufficientTier,
            RedeemError::RedemptionLimitReached,
            RedeemError::NotBusinessStaff,
            RedeemError::InvalidCode,
            RedeemError::AlreadyRedeemed,
            RedeemError::Expired,
            RedeemError::InsertFailed,
            RedeemError::Internal,
        ];
        let kinds: std::collections::HashSet<_> = all.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), all.len());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RedeemError::InvalidCode.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RedeemError::AlreadyRedeemed.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(RedeemError::Expired.into_response().status(), StatusCode::GONE);
        assert_eq!(
            RedeemError::NotAuthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
