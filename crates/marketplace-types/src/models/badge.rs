//! Badge and tier models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Achievement tier, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    /// Entry tier
    Verified,
    /// Middle tier
    Gold,
    /// Top tier
    Ultimate,
}

impl BadgeTier {
    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Verified => "Verified",
            Self::Gold => "Gold",
            Self::Ultimate => "Ultimate",
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which activity a badge rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeType {
    /// Sales of own products
    Creator,
    /// Resale volume
    Reseller,
}

/// A badge definition with its amount thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Tier
    pub tier: BadgeTier,
    /// Rewarded activity
    #[serde(rename = "type", alias = "badge_type", alias = "badgeType")]
    pub badge_type: BadgeType,
    /// Lower bound (inclusive)
    #[serde(alias = "minAmount")]
    pub min_amount: f64,
    /// Upper bound, `None` for the open-ended top tier
    #[serde(default, alias = "maxAmount")]
    pub max_amount: Option<f64>,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Progress towards badges of one type, computed backend-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeProgress {
    /// Activity measured
    #[serde(rename = "type", alias = "badge_type", alias = "badgeType")]
    pub badge_type: BadgeType,
    /// Amount accumulated so far
    #[serde(alias = "currentAmount")]
    pub current_amount: f64,
    /// Tier already reached
    #[serde(default, alias = "currentTier")]
    pub current_tier: Option<BadgeTier>,
    /// Tier being worked towards
    #[serde(default, alias = "nextTier")]
    pub next_tier: Option<BadgeTier>,
    /// All badges of this type
    #[serde(default)]
    pub badges: Vec<Badge>,
}

impl BadgeProgress {
    /// Badge definition for the next tier, if any.
    pub fn next_badge(&self) -> Option<&Badge> {
        let next = self.next_tier?;
        self.badges.iter().find(|b| b.tier == next)
    }
}
