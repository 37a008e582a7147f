//! Staff-side code validation and confirmation
//!
//! A missing or unparseable `code` is passed on as an empty code; the service
//! still checks the session first and then answers `invalid_code`.

use axum::{
    Extension, Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
};
use shared::models::{CodeQuery, ConfirmCodeRequest, ConfirmResponse, ValidationResponse};
use shared::util::now_millis;

use crate::auth::AuthContext;
use crate::redemption::RedeemError;
use crate::state::AppState;

/// GET /validate?code=...
pub async fn validate_code(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    query: Result<Query<CodeQuery>, QueryRejection>,
) -> Result<Json<ValidationResponse>, RedeemError> {
    let code = match query {
        Ok(Query(q)) => q.code,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unusable validate query");
            String::new()
        }
    };

    let redemption = state
        .redemptions
        .validate(auth.as_deref(), &code, now_millis())
        .await?;
    Ok(Json(ValidationResponse { redemption }))
}

/// POST /validate/confirm
pub async fn confirm_code(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    body: Result<Json<ConfirmCodeRequest>, JsonRejection>,
) -> Result<Json<ConfirmResponse>, RedeemError> {
    let code = match body {
        Ok(Json(req)) => req.code,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unusable confirm body");
            String::new()
        }
    };

    state
        .redemptions
        .confirm(auth.as_deref(), &code, now_millis())
        .await?;
    Ok(Json(ConfirmResponse { success: true }))
}
