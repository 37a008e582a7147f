//! Membership card endpoints

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Card, CardStatus, CardTier};
use shared::util::{now_millis, snowflake_id};

use crate::auth::AuthContext;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::store::StoreError;

/// POST /cards/claim
///
/// Creates a base-tier card, or returns the caller's existing active card.
pub async fn claim_card(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
) -> ServiceResult<Json<Card>> {
    let Some(Extension(auth)) = auth else {
        return Err(AppError::not_authenticated().into());
    };

    if let Some(card) = state.store.find_active_card(&auth.user_id).await? {
        return Ok(Json(card));
    }

    let card = Card {
        id: snowflake_id(),
        user_id: auth.user_id.clone(),
        tier: CardTier::Base.as_db().to_owned(),
        status: CardStatus::Active.as_db().to_owned(),
        claimed_at: now_millis(),
    };
    match state.store.insert_card(&card).await {
        Ok(()) => {
            tracing::info!(user_id = %auth.user_id, card_id = card.id, "Card claimed");
            Ok(Json(card))
        }
        // Lost a race with a concurrent claim; hand back the winner
        Err(StoreError::Conflict(_)) => state
            .store
            .find_active_card(&auth.user_id)
            .await?
            .map(Json)
            .ok_or_else(|| ServiceError::App(AppError::new(ErrorCode::CardAlreadyActive))),
        Err(e) => Err(e.into()),
    }
}

/// GET /cards/me
pub async fn my_card(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
) -> ServiceResult<Json<Card>> {
    let Some(Extension(auth)) = auth else {
        return Err(AppError::not_authenticated().into());
    };

    state
        .store
        .find_active_card(&auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Card").into())
}
