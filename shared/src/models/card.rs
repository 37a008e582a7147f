//! Membership card model

use serde::{Deserialize, Serialize};

/// Membership tier, totally ordered by [`CardTier::rank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTier {
    Base,
    Elevated,
    Top,
}

impl CardTier {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "base" => Some(Self::Base),
            "elevated" => Some(Self::Elevated),
            "top" => Some(Self::Top),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Elevated => "elevated",
            Self::Top => "top",
        }
    }

    /// Fixed rank used for tier gating (base=1, elevated=2, top=3)
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Base => 1,
            Self::Elevated => 2,
            Self::Top => 3,
        }
    }
}

/// Rank of a stored tier string. Unknown tiers rank 0.
pub fn tier_rank(tier: &str) -> u8 {
    CardTier::from_db(tier).map(|t| t.rank()).unwrap_or(0)
}

/// Card lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Inactive,
}

impl CardStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Card entity (one membership grant)
///
/// `tier` and `status` are kept as their stored strings so that rows written
/// by other tools with unrecognised values still load; gating goes through
/// [`tier_rank`] and [`Card::is_active`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Card {
    pub id: i64,
    pub user_id: String,
    pub tier: String,
    pub status: String,
    pub claimed_at: i64,
}

impl Card {
    pub fn is_active(&self) -> bool {
        CardStatus::from_db(&self.status) == Some(CardStatus::Active)
    }

    pub fn rank(&self) -> u8 {
        tier_rank(&self.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order() {
        assert!(CardTier::Base.rank() < CardTier::Elevated.rank());
        assert!(CardTier::Elevated.rank() < CardTier::Top.rank());
    }

    #[test]
    fn test_unknown_tier_ranks_zero() {
        assert_eq!(tier_rank("platinum"), 0);
        assert_eq!(tier_rank(""), 0);
        assert_eq!(tier_rank("Base"), 0);
        assert_eq!(tier_rank("base"), 1);
        assert_eq!(tier_rank("top"), 3);
    }

    #[test]
    fn test_db_roundtrip() {
        for tier in [CardTier::Base, CardTier::Elevated, CardTier::Top] {
            assert_eq!(CardTier::from_db(tier.as_db()), Some(tier));
        }
        assert_eq!(CardStatus::from_db("revoked"), None);
    }

    #[test]
    fn test_card_is_active() {
        let mut card = Card {
            id: 1,
            user_id: "u1".into(),
            tier: "elevated".into(),
            status: "active".into(),
            claimed_at: 0,
        };
        assert!(card.is_active());
        assert_eq!(card.rank(), 2);

        card.status = "inactive".into();
        assert!(!card.is_active());
    }
}
