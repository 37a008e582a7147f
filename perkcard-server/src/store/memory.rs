//! In-memory store
//!
//! All state sits behind one mutex, so every trait method is atomic with
//! respect to the others, matching the guarantees the Postgres store gets from
//! its unique indexes and conditional UPDATE.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{
    Card, NewRedemption, Perk, ReactionKind, RedemptionRecord, RedemptionStatus,
};
use tokio::sync::Mutex;

use super::{PerkStore, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    perks: HashMap<i64, Perk>,
    cards: Vec<Card>,
    redemptions: HashMap<i64, RedemptionRecord>,
    names: HashMap<String, String>,
    /// (user_id, perk_id, kind) -> created_at
    reactions: HashMap<(String, i64, ReactionKind), i64>,
    /// Redemption inserts still to be rejected as conflicts
    #[cfg(test)]
    forced_conflicts: u32,
}

#[derive(Clone, Default)]
pub struct MemoryPerkStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryPerkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a perk
    pub async fn put_perk(&self, perk: Perk) {
        self.inner.lock().await.perks.insert(perk.id, perk);
    }

    /// Insert a card without the one-active-card check (fixtures, tier grants)
    pub async fn put_card(&self, card: Card) {
        self.inner.lock().await.cards.push(card);
    }

    /// Reject the next `n` redemption inserts with a conflict
    #[cfg(test)]
    pub(crate) async fn force_insert_conflicts(&self, n: u32) {
        self.inner.lock().await.forced_conflicts = n;
    }

    pub async fn set_display_name(&self, user_id: &str, name: &str) {
        self.inner
            .lock()
            .await
            .names
            .insert(user_id.to_owned(), name.to_owned());
    }
}

#[async_trait]
impl PerkStore for MemoryPerkStore {
    async fn find_perk(&self, perk_id: i64) -> StoreResult<Option<Perk>> {
        Ok(self.inner.lock().await.perks.get(&perk_id).cloned())
    }

    async fn list_live_perks(&self, now: i64) -> StoreResult<Vec<Perk>> {
        let inner = self.inner.lock().await;
        let mut perks: Vec<Perk> = inner
            .perks
            .values()
            .filter(|p| p.is_live(now))
            .cloned()
            .collect();
        perks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(perks)
    }

    async fn find_active_card(&self, user_id: &str) -> StoreResult<Option<Card>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .cards
            .iter()
            .find(|c| c.user_id == user_id && c.is_active())
            .cloned())
    }

    async fn insert_card(&self, card: &Card) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if card.is_active()
            && inner
                .cards
                .iter()
                .any(|c| c.user_id == card.user_id && c.is_active())
        {
            return Err(StoreError::Conflict("active card".into()));
        }
        inner.cards.push(card.clone());
        Ok(())
    }

    async fn insert_redemption(&self, new: &NewRedemption) -> StoreResult<RedemptionRecord> {
        let mut inner = self.inner.lock().await;
        #[cfg(test)]
        if inner.forced_conflicts > 0 {
            inner.forced_conflicts -= 1;
            return Err(StoreError::Conflict("redemption id".into()));
        }
        if inner.redemptions.contains_key(&new.id)
            || inner.redemptions.values().any(|r| r.code == new.code)
        {
            return Err(StoreError::Conflict("redemption code".into()));
        }
        let record = RedemptionRecord {
            id: new.id,
            perk_id: new.perk_id,
            user_id: new.user_id.clone(),
            code: new.code.clone(),
            status: RedemptionStatus::Pending.as_db().to_owned(),
            created_at: new.created_at,
            expires_at: new.expires_at,
            redeemed_at: None,
        };
        inner.redemptions.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_redemption_by_code(&self, code: &str) -> StoreResult<Option<RedemptionRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.redemptions.values().find(|r| r.code == code).cloned())
    }

    async fn find_live_pending(
        &self,
        user_id: &str,
        perk_id: i64,
        now: i64,
    ) -> StoreResult<Option<RedemptionRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .redemptions
            .values()
            .filter(|r| r.user_id == user_id && r.perk_id == perk_id)
            .filter(|r| !r.is_redeemed() && !r.is_expired(now))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn mark_redeemed(&self, id: i64, now: i64) -> StoreResult<bool> {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.redemptions.get_mut(&id) else {
            return Ok(false);
        };
        if record.is_redeemed() || record.is_expired(now) {
            return Ok(false);
        }
        record.status = RedemptionStatus::Redeemed.as_db().to_owned();
        record.redeemed_at = Some(now);
        Ok(true)
    }

    async fn count_redemptions(&self, perk_id: i64, user_id: Option<&str>) -> StoreResult<i64> {
        let inner = self.inner.lock().await;
        let count = inner
            .redemptions
            .values()
            .filter(|r| r.perk_id == perk_id && r.is_redeemed())
            .filter(|r| user_id.is_none_or(|u| r.user_id == u))
            .count();
        Ok(count as i64)
    }

    async fn list_user_redemptions(
        &self,
        user_id: &str,
        limit: i64,
    ) -> StoreResult<Vec<RedemptionRecord>> {
        let inner = self.inner.lock().await;
        let mut records: Vec<RedemptionRecord> = inner
            .redemptions
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn display_name(&self, user_id: &str) -> StoreResult<Option<String>> {
        Ok(self.inner.lock().await.names.get(user_id).cloned())
    }

    async fn set_reaction(
        &self,
        user_id: &str,
        perk_id: i64,
        kind: ReactionKind,
        on: bool,
        now: i64,
    ) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        let key = (user_id.to_owned(), perk_id, kind);
        if on {
            inner.reactions.entry(key).or_insert(now);
        } else {
            inner.reactions.remove(&key);
        }
        Ok(())
    }

    async fn list_reactions(&self, user_id: &str, kind: ReactionKind) -> StoreResult<Vec<i64>> {
        let inner = self.inner.lock().await;
        let mut hits: Vec<(i64, i64)> = inner
            .reactions
            .iter()
            .filter(|((u, _, k), _)| u == user_id && *k == kind)
            .map(|((_, perk_id, _), created_at)| (*created_at, *perk_id))
            .collect();
        hits.sort_by(|a, b| b.cmp(a));
        Ok(hits.into_iter().map(|(_, perk_id)| perk_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_redemption(id: i64, code: &str) -> NewRedemption {
        NewRedemption {
            id,
            perk_id: 1,
            user_id: "u1".into(),
            code: code.into(),
            created_at: 0,
            expires_at: 45_000,
        }
    }

    fn card(id: i64, user_id: &str, status: &str) -> Card {
        Card {
            id,
            user_id: user_id.into(),
            tier: "base".into(),
            status: status.into(),
            claimed_at: 0,
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let store = MemoryPerkStore::new();
        store.insert_redemption(&new_redemption(1, "same")).await.unwrap();
        let err = store
            .insert_redemption(&new_redemption(2, "same"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_mark_redeemed_is_conditional() {
        let store = MemoryPerkStore::new();
        store.insert_redemption(&new_redemption(1, "c1")).await.unwrap();

        assert!(store.mark_redeemed(1, 10_000).await.unwrap());
        assert!(!store.mark_redeemed(1, 20_000).await.unwrap());

        let record = store.find_redemption_by_code("c1").await.unwrap().unwrap();
        assert_eq!(record.redeemed_at, Some(10_000));
    }

    #[tokio::test]
    async fn test_mark_redeemed_rejects_expired() {
        let store = MemoryPerkStore::new();
        store.insert_redemption(&new_redemption(1, "c1")).await.unwrap();

        assert!(!store.mark_redeemed(1, 45_001).await.unwrap());
        let record = store.find_redemption_by_code("c1").await.unwrap().unwrap();
        assert_eq!(record.status, "pending");
        assert!(store.mark_redeemed(99, 0).await.is_ok_and(|ok| !ok));
    }

    #[tokio::test]
    async fn test_one_active_card_per_user() {
        let store = MemoryPerkStore::new();
        store.insert_card(&card(1, "u1", "active")).await.unwrap();
        let err = store.insert_card(&card(2, "u1", "active")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        store.insert_card(&card(3, "u1", "inactive")).await.unwrap();
        store.insert_card(&card(4, "u2", "active")).await.unwrap();
        assert_eq!(store.find_active_card("u1").await.unwrap().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_reactions_toggle() {
        let store = MemoryPerkStore::new();
        store.set_reaction("u1", 5, ReactionKind::Like, true, 1).await.unwrap();
        store.set_reaction("u1", 5, ReactionKind::Like, true, 2).await.unwrap();
        store.set_reaction("u1", 6, ReactionKind::Save, true, 3).await.unwrap();

        assert_eq!(store.list_reactions("u1", ReactionKind::Like).await.unwrap(), vec![5]);
        assert_eq!(store.list_reactions("u1", ReactionKind::Save).await.unwrap(), vec![6]);

        store.set_reaction("u1", 5, ReactionKind::Like, false, 4).await.unwrap();
        assert!(store.list_reactions("u1", ReactionKind::Like).await.unwrap().is_empty());
    }
}
