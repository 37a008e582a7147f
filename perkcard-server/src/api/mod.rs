//! HTTP routes

pub mod cards;
pub mod health;
pub mod perks;
pub mod redeem;
pub mod validate;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{confirm_rate_limit, issue_rate_limit};
use crate::auth::session::session_middleware;
use crate::state::AppState;

/// Build the full router
pub fn create_router(state: AppState) -> Router {
    let issue = Router::new()
        .route("/redeem/new", post(redeem::issue_code))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            issue_rate_limit,
        ));

    let confirm = Router::new()
        .route("/validate/confirm", post(validate::confirm_code))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            confirm_rate_limit,
        ));

    let api = Router::new()
        .route("/validate", get(validate::validate_code))
        .route("/redemptions/me", get(redeem::my_redemptions))
        .route("/cards/claim", post(cards::claim_card))
        .route("/cards/me", get(cards::my_card))
        .route("/perks", get(perks::list_perks))
        .route("/perks/{id}/like", put(perks::like).delete(perks::unlike))
        .route("/perks/{id}/save", put(perks::save).delete(perks::unsave))
        .merge(issue)
        .merge(confirm)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
