//! Redemption record model and redemption wire types

use serde::{Deserialize, Serialize};

/// Redemption status as seen by callers
///
/// Only `pending` and `redeemed` are ever stored; `expired` is derived at read
/// time from `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Pending,
    Redeemed,
    Expired,
}

impl RedemptionStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "redeemed" => Some(Self::Redeemed),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
        }
    }
}

/// Redemption record (one issued code)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RedemptionRecord {
    pub id: i64,
    pub perk_id: i64,
    pub user_id: String,
    pub code: String,
    pub status: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub redeemed_at: Option<i64>,
}

impl RedemptionRecord {
    /// Expiry is strict: a code is still usable at exactly `expires_at`.
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }

    pub fn is_redeemed(&self) -> bool {
        RedemptionStatus::from_db(&self.status) == Some(RedemptionStatus::Redeemed)
    }

    /// Status with expiry folded in; redeemed wins over expired
    pub fn status_at(&self, now: i64) -> RedemptionStatus {
        if self.is_redeemed() {
            RedemptionStatus::Redeemed
        } else if self.is_expired(now) {
            RedemptionStatus::Expired
        } else {
            RedemptionStatus::Pending
        }
    }
}

/// Values for a record about to be inserted as `pending`
#[derive(Debug, Clone)]
pub struct NewRedemption {
    pub id: i64,
    pub perk_id: i64,
    pub user_id: String,
    pub code: String,
    pub created_at: i64,
    pub expires_at: i64,
}

// ── Wire types ──

/// POST /redeem/new body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub perk_id: i64,
}

/// Accept an id as a JSON number or a numeric string
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Str(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// POST /redeem/new success body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCode {
    pub ok: bool,
    pub redemption_id: i64,
    pub code: String,
    pub expires_at: i64,
}

/// GET /validate query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeQuery {
    pub code: String,
}

/// POST /validate/confirm body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmCodeRequest {
    pub code: String,
}

/// What staff see before consuming a code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionDetails {
    pub status: RedemptionStatus,
    pub perk_title: String,
    pub perk_description: Option<String>,
    pub user_name: String,
    pub expires_at: i64,
    pub created_at: i64,
}

/// GET /validate success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub redemption: RedemptionDetails,
}

/// POST /validate/confirm success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub success: bool,
}

/// One row of a cardholder's redemption history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionHistoryEntry {
    pub id: i64,
    pub perk_id: i64,
    pub status: RedemptionStatus,
    pub created_at: i64,
    pub expires_at: i64,
    pub redeemed_at: Option<i64>,
}
