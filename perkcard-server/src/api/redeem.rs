//! Cardholder redemption endpoints

use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection};
use shared::models::{IssueCodeRequest, IssuedCode, RedemptionHistoryEntry};
use shared::util::now_millis;

use crate::auth::AuthContext;
use crate::redemption::RedeemError;
use crate::state::AppState;

/// History rows returned by GET /redemptions/me
const HISTORY_LIMIT: i64 = 50;

/// POST /redeem/new
///
/// A body without a usable `perkId` names no perk, so it is answered as
/// `perk_not_found` once the session check has passed.
pub async fn issue_code(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    body: Result<Json<IssueCodeRequest>, JsonRejection>,
) -> Result<Json<IssuedCode>, RedeemError> {
    let auth = auth.as_deref().ok_or(RedeemError::NotAuthenticated)?;
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unusable issue request body");
            return Err(RedeemError::PerkNotFound);
        }
    };

    let issued = state
        .redemptions
        .issue(Some(auth), req.perk_id, now_millis())
        .await?;

    Ok(Json(IssuedCode {
        ok: true,
        redemption_id: issued.redemption_id,
        code: issued.code,
        expires_at: issued.expires_at,
    }))
}

/// GET /redemptions/me
pub async fn my_redemptions(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
) -> Result<Json<Vec<RedemptionHistoryEntry>>, RedeemError> {
    let history = state
        .redemptions
        .history(auth.as_deref(), HISTORY_LIMIT, now_millis())
        .await?;
    Ok(Json(history))
}
