//! Perk (business offer) model

use serde::{Deserialize, Serialize};

/// Perk entity published by a business
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Perk {
    pub id: i64,
    pub business_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Stored tier name; compared by rank, unknown names rank 0
    pub required_card_tier: String,
    pub active: bool,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub max_redemptions_total: Option<i32>,
    pub max_redemptions_per_user: Option<i32>,
    pub created_at: i64,
}

impl Perk {
    /// Live iff active AND (no start or start <= now) AND (no end or end > now)
    pub fn is_live(&self, now: i64) -> bool {
        self.active
            && self.starts_at.is_none_or(|start| start <= now)
            && self.ends_at.is_none_or(|end| end > now)
    }
}

/// Per-user reaction to a perk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Save,
}

impl ReactionKind {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Save => "save",
        }
    }
}

/// Perk as listed to a cardholder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerkListing {
    #[serde(flatten)]
    pub perk: Perk,
    /// Caller's active card satisfies the required tier
    pub eligible: bool,
    pub liked: bool,
    pub saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perk(active: bool, starts_at: Option<i64>, ends_at: Option<i64>) -> Perk {
        Perk {
            id: 1,
            business_id: 10,
            title: "Free coffee".into(),
            description: None,
            required_card_tier: "base".into(),
            active,
            starts_at,
            ends_at,
            max_redemptions_total: None,
            max_redemptions_per_user: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_live_without_window() {
        assert!(perk(true, None, None).is_live(1_000));
        assert!(!perk(false, None, None).is_live(1_000));
    }

    #[test]
    fn test_live_window_bounds() {
        let p = perk(true, Some(100), Some(200));
        assert!(!p.is_live(99));
        assert!(p.is_live(100));
        assert!(p.is_live(199));
        assert!(!p.is_live(200));
    }

    #[test]
    fn test_listing_flattens_perk() {
        let listing = PerkListing {
            perk: perk(true, None, None),
            eligible: true,
            liked: false,
            saved: true,
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["title"], "Free coffee");
        assert_eq!(json["eligible"], true);
        assert_eq!(json["saved"], true);
    }
}
