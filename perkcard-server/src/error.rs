//! Service-layer error for the card and perk endpoints
//!
//! `ServiceError` lets handlers use `?` on store calls; store failures are
//! logged once here and surface as `InternalError`. Redemption endpoints use
//! [`crate::redemption::RedeemError`] instead.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::store::StoreError;

#[derive(Debug)]
pub enum ServiceError {
    /// Storage failure (logged, mapped to InternalError)
    Store(StoreError),
    /// Business-rule error passed through to the client
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Store(store_err) => {
                tracing::error!(error = %store_err, "Service store error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
