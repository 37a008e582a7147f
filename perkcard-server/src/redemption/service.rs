//! Issuance, validation and confirmation of redemption codes

use std::sync::Arc;

use shared::models::{
    NewRedemption, Perk, RedemptionDetails, RedemptionHistoryEntry, RedemptionRecord,
};
use shared::util::snowflake_id;

use super::{RedeemError, code, eligibility};
use crate::auth::AuthContext;
use crate::store::{PerkStore, StoreError};

/// Shown to staff when the customer has no profile row
const FALLBACK_USER_NAME: &str = "Member";

/// Id/code draws per issuance before giving up with `insert_failed`
const INSERT_ATTEMPTS: u32 = 4;

/// Issued (or re-used) code handed back to the cardholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    pub redemption_id: i64,
    pub code: String,
    pub expires_at: i64,
}

impl From<RedemptionRecord> for Issued {
    fn from(record: RedemptionRecord) -> Self {
        Self {
            redemption_id: record.id,
            code: record.code,
            expires_at: record.expires_at,
        }
    }
}

fn internal(e: StoreError) -> RedeemError {
    tracing::error!(error = %e, "Redemption store error");
    RedeemError::Internal
}

#[derive(Clone)]
pub struct RedemptionService {
    store: Arc<dyn PerkStore>,
}

impl RedemptionService {
    pub fn new(store: Arc<dyn PerkStore>) -> Self {
        Self { store }
    }

    /// Mint a code for `perk_id` after the eligibility checks pass.
    ///
    /// A still-valid pending code for the same (user, perk) is returned
    /// instead of minting a second one.
    pub async fn issue(
        &self,
        auth: Option<&AuthContext>,
        perk_id: i64,
        now: i64,
    ) -> Result<Issued, RedeemError> {
        let auth = auth.ok_or(RedeemError::NotAuthenticated)?;

        let perk = self.store.find_perk(perk_id).await.map_err(internal)?;
        let perk = eligibility::check_perk(perk, now)?;

        let card = self
            .store
            .find_active_card(&auth.user_id)
            .await
            .map_err(internal)?;
        eligibility::check_card(card.as_ref(), &perk)?;

        if let Some(existing) = self
            .store
            .find_live_pending(&auth.user_id, perk.id, now)
            .await
            .map_err(internal)?
        {
            tracing::debug!(perk_id, redemption_id = existing.id, "Re-using pending code");
            return Ok(existing.into());
        }

        self.check_limits(&perk, &auth.user_id).await?;

        let record = self.insert_fresh(&perk, &auth.user_id, now).await?;

        tracing::info!(
            perk_id,
            redemption_id = record.id,
            user_id = %auth.user_id,
            "Redemption code issued"
        );
        Ok(record.into())
    }

    /// Insert a new pending record, drawing a fresh id and code when a
    /// uniqueness conflict (id or code collision) rejects the write
    async fn insert_fresh(
        &self,
        perk: &Perk,
        user_id: &str,
        now: i64,
    ) -> Result<RedemptionRecord, RedeemError> {
        let mut attempt = 1;
        loop {
            let new = NewRedemption {
                id: snowflake_id(),
                perk_id: perk.id,
                user_id: user_id.to_owned(),
                code: code::generate_code(),
                created_at: now,
                expires_at: code::expires_at(now),
            };
            match self.store.insert_redemption(&new).await {
                Ok(record) => return Ok(record),
                Err(StoreError::Conflict(what)) if attempt < INSERT_ATTEMPTS => {
                    tracing::debug!(
                        perk_id = perk.id,
                        attempt,
                        %what,
                        "Redemption insert collided"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        perk_id = perk.id,
                        "Failed to insert redemption"
                    );
                    return Err(RedeemError::InsertFailed);
                }
            }
        }
    }

    async fn check_limits(&self, perk: &Perk, user_id: &str) -> Result<(), RedeemError> {
        if perk.max_redemptions_total.is_none() && perk.max_redemptions_per_user.is_none() {
            return Ok(());
        }
        let total = match perk.max_redemptions_total {
            Some(_) => self
                .store
                .count_redemptions(perk.id, None)
                .await
                .map_err(internal)?,
            None => 0,
        };
        let by_user = match perk.max_redemptions_per_user {
            Some(_) => self
                .store
                .count_redemptions(perk.id, Some(user_id))
                .await
                .map_err(internal)?,
            None => 0,
        };
        eligibility::check_limits(perk, total, by_user)
    }

    /// Resolve a code and the perk it belongs to, enforcing staff access
    async fn load_for_staff(
        &self,
        auth: Option<&AuthContext>,
        code: &str,
    ) -> Result<(RedemptionRecord, Perk), RedeemError> {
        let auth = auth.ok_or(RedeemError::NotAuthenticated)?;
        if code.is_empty() {
            return Err(RedeemError::InvalidCode);
        }

        let record = self
            .store
            .find_redemption_by_code(code)
            .await
            .map_err(internal)?
            .ok_or(RedeemError::InvalidCode)?;

        let perk = self
            .store
            .find_perk(record.perk_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                tracing::error!(
                    redemption_id = record.id,
                    perk_id = record.perk_id,
                    "Redemption references a missing perk"
                );
                RedeemError::Internal
            })?;

        if !auth.is_staff_of(perk.business_id) {
            tracing::warn!(
                user_id = %auth.user_id,
                business_id = perk.business_id,
                "Code lookup by non-staff user"
            );
            return Err(RedeemError::NotBusinessStaff);
        }

        Ok((record, perk))
    }

    /// Read-only inspection of a code for business staff.
    ///
    /// Pending codes past their expiry are reported with status `expired`;
    /// redeemed codes fail with `already_redeemed`.
    pub async fn validate(
        &self,
        auth: Option<&AuthContext>,
        code: &str,
        now: i64,
    ) -> Result<RedemptionDetails, RedeemError> {
        let (record, perk) = self.load_for_staff(auth, code).await?;

        if record.is_redeemed() {
            return Err(RedeemError::AlreadyRedeemed);
        }

        let user_name = self
            .store
            .display_name(&record.user_id)
            .await
            .map_err(internal)?
            .unwrap_or_else(|| FALLBACK_USER_NAME.to_owned());

        Ok(RedemptionDetails {
            status: record.status_at(now),
            perk_title: perk.title,
            perk_description: perk.description,
            user_name,
            expires_at: record.expires_at,
            created_at: record.created_at,
        })
    }

    /// Consume a code: pending -> redeemed, at most once.
    ///
    /// Preconditions are re-checked here and then enforced again by the
    /// store's conditional update, so concurrent confirmations of one code
    /// yield exactly one success.
    pub async fn confirm(
        &self,
        auth: Option<&AuthContext>,
        code: &str,
        now: i64,
    ) -> Result<(), RedeemError> {
        let (record, _perk) = self.load_for_staff(auth, code).await?;

        if record.is_redeemed() {
            return Err(RedeemError::AlreadyRedeemed);
        }
        if record.is_expired(now) {
            tracing::info!(redemption_id = record.id, "Confirmation of expired code rejected");
            return Err(RedeemError::Expired);
        }

        if self
            .store
            .mark_redeemed(record.id, now)
            .await
            .map_err(internal)?
        {
            tracing::info!(
                redemption_id = record.id,
                perk_id = record.perk_id,
                "Redemption confirmed"
            );
            return Ok(());
        }

        // Lost the conditional update; report why from the current row
        let current = self
            .store
            .find_redemption_by_code(code)
            .await
            .map_err(internal)?
            .ok_or(RedeemError::InvalidCode)?;
        if current.is_redeemed() {
            Err(RedeemError::AlreadyRedeemed)
        } else if current.is_expired(now) {
            Err(RedeemError::Expired)
        } else {
            tracing::error!(redemption_id = record.id, "Conditional redeem matched no row");
            Err(RedeemError::Internal)
        }
    }

    /// The caller's own redemptions, most recent first
    pub async fn history(
        &self,
        auth: Option<&AuthContext>,
        limit: i64,
        now: i64,
    ) -> Result<Vec<RedemptionHistoryEntry>, RedeemError> {
        let auth = auth.ok_or(RedeemError::NotAuthenticated)?;
        let records = self
            .store
            .list_user_redemptions(&auth.user_id, limit)
            .await
            .map_err(internal)?;

        Ok(records
            .into_iter()
            .map(|r| RedemptionHistoryEntry {
                status: r.status_at(now),
                id: r.id,
                perk_id: r.perk_id,
                created_at: r.created_at,
                expires_at: r.expires_at,
                redeemed_at: r.redeemed_at,
            })
            .collect())
    }
}
