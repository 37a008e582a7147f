//! Issuance eligibility checks
//!
//! Pure functions over already-loaded rows. The service calls them in order
//! and stops at the first failure.

use shared::models::{Card, Perk, tier_rank};

use super::RedeemError;

/// Card tier satisfies the perk's required tier.
///
/// Unknown card tiers rank 0 and so fail against every known tier. An unknown
/// required tier also fails: a misconfigured perk is not redeemable.
pub fn tier_satisfies(card_tier: &str, required_tier: &str) -> bool {
    let required = tier_rank(required_tier);
    required > 0 && tier_rank(card_tier) >= required
}

/// Perk exists and is live at `now`
pub fn check_perk(perk: Option<Perk>, now: i64) -> Result<Perk, RedeemError> {
    let perk = perk.ok_or(RedeemError::PerkNotFound)?;
    if !perk.is_live(now) {
        return Err(RedeemError::PerkInactive);
    }
    Ok(perk)
}

/// Caller holds an active card whose tier ranks at least the required tier
pub fn check_card(card: Option<&Card>, perk: &Perk) -> Result<(), RedeemError> {
    let card = card
        .filter(|c| c.is_active())
        .ok_or(RedeemError::NoActiveCard)?;
    if !tier_satisfies(&card.tier, &perk.required_card_tier) {
        return Err(RedeemError::InsufficientTier);
    }
    Ok(())
}

/// Redeemed counts are below the perk's caps
pub fn check_limits(
    perk: &Perk,
    redeemed_total: i64,
    redeemed_by_user: i64,
) -> Result<(), RedeemError> {
    let over = |cap: Option<i32>, used: i64| cap.is_some_and(|cap| used >= i64::from(cap));
    if over(perk.max_redemptions_total, redeemed_total)
        || over(perk.max_redemptions_per_user, redeemed_by_user)
    {
        return Err(RedeemError::RedemptionLimitReached);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [&str; 3] = ["base", "elevated", "top"];

    fn perk(required: &str, active: bool) -> Perk {
        Perk {
            id: 1,
            business_id: 10,
            title: "Free coffee".into(),
            description: None,
            required_card_tier: required.into(),
            active,
            starts_at: None,
            ends_at: None,
            max_redemptions_total: None,
            max_redemptions_per_user: None,
            created_at: 0,
        }
    }

    fn card(tier: &str) -> Card {
        Card {
            id: 1,
            user_id: "u1".into(),
            tier: tier.into(),
            status: "active".into(),
            claimed_at: 0,
        }
    }

    #[test]
    fn test_tier_gate_over_all_pairs() {
        for (ri, required) in TIERS.iter().enumerate() {
            for (ci, held) in TIERS.iter().enumerate() {
                let result = check_card(Some(&card(held)), &perk(required, true));
                if ci < ri {
                    assert_eq!(result, Err(RedeemError::InsufficientTier), "{held} vs {required}");
                } else {
                    assert_eq!(result, Ok(()), "{held} vs {required}");
                }
            }
        }
    }

    #[test]
    fn test_unknown_tiers_fail_closed() {
        assert!(!tier_satisfies("diamond", "base"));
        assert!(!tier_satisfies("top", "diamond"));
        assert!(!tier_satisfies("", ""));
    }

    #[test]
    fn test_missing_or_inactive_card() {
        let p = perk("base", true);
        assert_eq!(check_card(None, &p), Err(RedeemError::NoActiveCard));

        let mut c = card("top");
        c.status = "inactive".into();
        assert_eq!(check_card(Some(&c), &p), Err(RedeemError::NoActiveCard));
    }

    #[test]
    fn test_check_perk() {
        assert_eq!(check_perk(None, 0).unwrap_err(), RedeemError::PerkNotFound);
        assert_eq!(
            check_perk(Some(perk("base", false)), 0).unwrap_err(),
            RedeemError::PerkInactive
        );

        let mut windowed = perk("base", true);
        windowed.starts_at = Some(1_000);
        windowed.ends_at = Some(2_000);
        assert_eq!(
            check_perk(Some(windowed.clone()), 500).unwrap_err(),
            RedeemError::PerkInactive
        );
        assert!(check_perk(Some(windowed.clone()), 1_500).is_ok());
        assert_eq!(
            check_perk(Some(windowed), 2_000).unwrap_err(),
            RedeemError::PerkInactive
        );
    }

    #[test]
    fn test_limits() {
        let mut p = perk("base", true);
        assert!(check_limits(&p, 1_000, 1_000).is_ok());

        p.max_redemptions_total = Some(3);
        assert!(check_limits(&p, 2, 0).is_ok());
        assert_eq!(check_limits(&p, 3, 0), Err(RedeemError::RedemptionLimitReached));

        p.max_redemptions_total = None;
        p.max_redemptions_per_user = Some(1);
        assert!(check_limits(&p, 10, 0).is_ok());
        assert_eq!(check_limits(&p, 10, 1), Err(RedeemError::RedemptionLimitReached));
    }
}
