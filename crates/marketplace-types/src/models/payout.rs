//! Payouts, Stripe Connect, and referral models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payout lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Requested, not yet processed
    Pending,
    /// Transfer in progress
    Processing,
    /// Funds delivered
    Paid,
    /// Transfer failed
    Failed,
}

/// A single payout to the user's connected account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payout {
    /// Unique identifier
    pub id: String,
    /// Amount in account currency
    pub amount: f64,
    /// Current status
    pub status: PayoutStatus,
    /// Request timestamp
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Stripe Connect account state for the current user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ConnectStatus {
    /// A connected account exists
    #[serde(default)]
    pub connected: bool,
    /// Stripe accepts charges for the account
    #[serde(default, alias = "chargesEnabled")]
    pub charges_enabled: bool,
    /// Stripe allows payouts to the account
    #[serde(default, alias = "payoutsEnabled")]
    pub payouts_enabled: bool,
    /// Onboarding form completed
    #[serde(default, alias = "detailsSubmitted")]
    pub details_submitted: bool,
}

impl ConnectStatus {
    /// Whether the user still has onboarding steps to complete.
    pub const fn needs_onboarding(&self) -> bool {
        !self.connected || !self.details_submitted || !self.payouts_enabled
    }
}

/// Opaque Stripe-hosted link generated by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnboardingLink {
    /// URL to open in a browser
    #[serde(alias = "link")]
    pub url: String,
}

/// The user's referral code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferralCode {
    /// Short code to share
    #[serde(alias = "referralCode", alias = "referral_code")]
    pub code: String,
    /// Full invitation link
    #[serde(default, alias = "referralLink", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Aggregated referral statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ReferralStats {
    /// Users who signed up with the code
    #[serde(default, alias = "totalReferrals")]
    pub total_referrals: u32,
    /// Referred users who made a purchase
    #[serde(default, alias = "activeReferrals")]
    pub active_referrals: u32,
    /// Rewards earned
    #[serde(default, alias = "totalEarnings")]
    pub total_earnings: f64,
}

/// Dashboard counters for admins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AdminStats {
    /// Registered users
    #[serde(default, alias = "totalUsers")]
    pub total_users: u64,
    /// Products in any status
    #[serde(default, alias = "totalProducts")]
    pub total_products: u64,
    /// Products awaiting moderation
    #[serde(default, alias = "pendingProducts")]
    pub pending_products: u64,
    /// Gross revenue
    #[serde(default, alias = "totalRevenue")]
    pub total_revenue: f64,
}
