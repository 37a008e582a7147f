//! Persistence seam for cards, perks, redemptions and reactions
//!
//! [`PerkStore`] is implemented by [`PgPerkStore`] (PostgreSQL) and by
//! [`MemoryPerkStore`], which backs tests and local runs without a database.

mod memory;
mod postgres;

pub use memory::MemoryPerkStore;
pub use postgres::PgPerkStore;

use async_trait::async_trait;
use shared::models::{Card, NewRedemption, Perk, ReactionKind, RedemptionRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A uniqueness rule rejected the write
    #[error("conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PerkStore: Send + Sync {
    async fn find_perk(&self, perk_id: i64) -> StoreResult<Option<Perk>>;

    /// Perks that are live at `now`, newest first
    async fn list_live_perks(&self, now: i64) -> StoreResult<Vec<Perk>>;

    async fn find_active_card(&self, user_id: &str) -> StoreResult<Option<Card>>;

    /// Insert an active card. Fails with [`StoreError::Conflict`] when the
    /// owner already holds one.
    async fn insert_card(&self, card: &Card) -> StoreResult<()>;

    /// Insert a `pending` record. Fails with [`StoreError::Conflict`] on a
    /// duplicate code.
    async fn insert_redemption(&self, new: &NewRedemption) -> StoreResult<RedemptionRecord>;

    async fn find_redemption_by_code(&self, code: &str) -> StoreResult<Option<RedemptionRecord>>;

    /// Newest pending record for (user, perk) that is not expired at `now`
    async fn find_live_pending(
        &self,
        user_id: &str,
        perk_id: i64,
        now: i64,
    ) -> StoreResult<Option<RedemptionRecord>>;

    /// Conditional pending -> redeemed transition.
    ///
    /// Succeeds (returns `true`) only if the record is still pending and
    /// `now <= expires_at`; the check and the write are a single atomic step.
    async fn mark_redeemed(&self, id: i64, now: i64) -> StoreResult<bool>;

    /// Number of redeemed records for a perk, optionally for one user
    async fn count_redemptions(&self, perk_id: i64, user_id: Option<&str>) -> StoreResult<i64>;

    async fn list_user_redemptions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<RedemptionRecord>>;

    async fn display_name(&self, user_id: &str) -> StoreResult<Option<String>>;

    /// Set or clear a reaction; idempotent in both directions
    async fn set_reaction(
        &self,
        user_id: &str,
        perk_id: i64,
        kind: ReactionKind,
        on: bool,
        now: i64,
    ) -> StoreResult<()>;

    /// Perk ids the user has reacted to with `kind`
    async fn list_reactions(&self, user_id: &str, kind: ReactionKind) -> StoreResult<Vec<i64>>;
}
