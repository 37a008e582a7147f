//! PostgreSQL-backed store

use async_trait::async_trait;
use shared::models::{Card, NewRedemption, Perk, ReactionKind, RedemptionRecord};
use sqlx::PgPool;

use super::{PerkStore, StoreError, StoreResult};

#[derive(Clone)]
pub struct PgPerkStore {
    pool: PgPool,
}

impl PgPerkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or_db(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(what.to_string())
        }
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl PerkStore for PgPerkStore {
    async fn find_perk(&self, perk_id: i64) -> StoreResult<Option<Perk>> {
        let perk = sqlx::query_as("SELECT * FROM perks WHERE id = $1")
            .bind(perk_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(perk)
    }

    async fn list_live_perks(&self, now: i64) -> StoreResult<Vec<Perk>> {
        let perks = sqlx::query_as(
            "SELECT * FROM perks
             WHERE active
               AND (starts_at IS NULL OR starts_at <= $1)
               AND (ends_at IS NULL OR ends_at > $1)
             ORDER BY created_at DESC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(perks)
    }

    async fn find_active_card(&self, user_id: &str) -> StoreResult<Option<Card>> {
        let card = sqlx::query_as(
            "SELECT id, user_id, tier, status, claimed_at FROM cards
             WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn insert_card(&self, card: &Card) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO cards (id, user_id, tier, status, claimed_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(card.id)
        .bind(&card.user_id)
        .bind(&card.tier)
        .bind(&card.status)
        .bind(card.claimed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, "active card"))?;
        Ok(())
    }

    async fn insert_redemption(&self, new: &NewRedemption) -> StoreResult<RedemptionRecord> {
        let record = sqlx::query_as(
            "INSERT INTO perk_redemptions
                 (id, perk_id, user_id, code, status, created_at, expires_at)
             VALUES ($1, $2, $3, $4, 'pending', $5, $6)
             RETURNING *",
        )
        .bind(new.id)
        .bind(new.perk_id)
        .bind(&new.user_id)
        .bind(&new.code)
        .bind(new.created_at)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, "redemption code"))?;
        Ok(record)
    }

    async fn find_redemption_by_code(&self, code: &str) -> StoreResult<Option<RedemptionRecord>> {
        let record = sqlx::query_as("SELECT * FROM perk_redemptions WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_live_pending(
        &self,
        user_id: &str,
        perk_id: i64,
        now: i64,
    ) -> StoreResult<Option<RedemptionRecord>> {
        let record = sqlx::query_as(
            "SELECT * FROM perk_redemptions
             WHERE user_id = $1 AND perk_id = $2 AND status = 'pending' AND expires_at >= $3
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(user_id)
        .bind(perk_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn mark_redeemed(&self, id: i64, now: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE perk_redemptions SET status = 'redeemed', redeemed_at = $2
             WHERE id = $1 AND status = 'pending' AND expires_at >= $2",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn count_redemptions(&self, perk_id: i64, user_id: Option<&str>) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM perk_redemptions
             WHERE perk_id = $1 AND status = 'redeemed' AND ($2::TEXT IS NULL OR user_id = $2)",
        )
        .bind(perk_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn list_user_redemptions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<RedemptionRecord>> {
        let records = sqlx::query_as(
            "SELECT * FROM perk_redemptions WHERE user_id = $1
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn display_name(&self, user_id: &str) -> StoreResult<Option<String>> {
        let name = sqlx::query_scalar("SELECT display_name FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }

    async fn set_reaction(
        &self,
        user_id: &str,
        perk_id: i64,
        kind: ReactionKind,
        on: bool,
        now: i64,
    ) -> StoreResult<()> {
        if on {
            sqlx::query(
                "INSERT INTO perk_reactions (user_id, perk_id, kind, created_at)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (user_id, perk_id, kind) DO NOTHING",
            )
            .bind(user_id)
            .bind(perk_id)
            .bind(kind.as_db())
            .bind(now)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                "DELETE FROM perk_reactions
                 WHERE user_id = $1 AND perk_id = $2 AND kind = $3",
            )
            .bind(user_id)
            .bind(perk_id)
            .bind(kind.as_db())
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn list_reactions(&self, user_id: &str, kind: ReactionKind) -> StoreResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT perk_id FROM perk_reactions WHERE user_id = $1 AND kind = $2
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(kind.as_db())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
