//! Perk listing and reactions

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{PerkListing, ReactionKind};
use shared::util::now_millis;

use crate::auth::AuthContext;
use crate::error::ServiceResult;
use crate::redemption::eligibility::tier_satisfies;
use crate::state::AppState;

/// GET /perks
///
/// Live perks, newest first. Anonymous callers see every flag as false.
pub async fn list_perks(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
) -> ServiceResult<Json<Vec<PerkListing>>> {
    let now = now_millis();
    let perks = state.store.list_live_perks(now).await?;

    let (card, liked, saved) = match auth.as_deref() {
        Some(auth) => (
            state.store.find_active_card(&auth.user_id).await?,
            state.store.list_reactions(&auth.user_id, ReactionKind::Like).await?,
            state.store.list_reactions(&auth.user_id, ReactionKind::Save).await?,
        ),
        None => (None, Vec::new(), Vec::new()),
    };
    let liked: HashSet<i64> = liked.into_iter().collect();
    let saved: HashSet<i64> = saved.into_iter().collect();

    let listings = perks
        .into_iter()
        .map(|perk| PerkListing {
            eligible: card
                .as_ref()
                .is_some_and(|c| tier_satisfies(&c.tier, &perk.required_card_tier)),
            liked: liked.contains(&perk.id),
            saved: saved.contains(&perk.id),
            perk,
        })
        .collect();
    Ok(Json(listings))
}

async fn react(
    state: &AppState,
    auth: Option<Extension<AuthContext>>,
    path: Result<Path<i64>, PathRejection>,
    kind: ReactionKind,
    on: bool,
) -> ServiceResult<Json<serde_json::Value>> {
    let Some(Extension(auth)) = auth else {
        return Err(AppError::not_authenticated().into());
    };
    let Path(perk_id) = path.map_err(|rejection| {
        AppError::validation("perk id must be an integer")
            .with_detail("field", "id")
            .with_detail("reason", rejection.body_text())
    })?;
    if state.store.find_perk(perk_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::PerkNotFound).into());
    }

    state
        .store
        .set_reaction(&auth.user_id, perk_id, kind, on, now_millis())
        .await?;
    tracing::debug!(
        user_id = %auth.user_id,
        perk_id,
        kind = kind.as_db(),
        on,
        "Reaction updated"
    );

    Ok(Json(serde_json::json!({ "ok": true, "active": on })))
}

/// PUT /perks/{id}/like
pub async fn like(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServiceResult<Json<serde_json::Value>> {
    react(&state, auth, path, ReactionKind::Like, true).await
}

/// DELETE /perks/{id}/like
pub async fn unlike(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServiceResult<Json<serde_json::Value>> {
    react(&state, auth, path, ReactionKind::Like, false).await
}

/// PUT /perks/{id}/save
pub async fn save(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServiceResult<Json<serde_json::Value>> {
    react(&state, auth, path, ReactionKind::Save, true).await
}

/// DELETE /perks/{id}/save
pub async fn unsave(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    path: Result<Path<i64>, PathRejection>,
) -> ServiceResult<Json<serde_json::Value>> {
    react(&state, auth, path, ReactionKind::Save, false).await
}
