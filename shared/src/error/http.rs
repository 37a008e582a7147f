//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound | Self::PerkNotFound | Self::InvalidCode => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::CardAlreadyActive
            | Self::AlreadyRedeemed
            | Self::RedemptionLimitReached => StatusCode::CONFLICT,

            // 410 Gone
            Self::CodeExpired => StatusCode::GONE,

            // 401 Unauthorized
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::NotBusinessStaff
            | Self::NoActiveCard
            | Self::InsufficientTier
            | Self::PerkInactive => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::InternalError | Self::InsertFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PerkNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InvalidCode.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_redemption_conflicts() {
        assert_eq!(ErrorCode::AlreadyRedeemed.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::CodeExpired.http_status(), StatusCode::GONE);
        assert_eq!(
            ErrorCode::RedemptionLimitReached.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_eligibility_forbidden() {
        assert_eq!(ErrorCode::NoActiveCard.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::InsufficientTier.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::PerkInactive.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotBusinessStaff.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::InsertFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
