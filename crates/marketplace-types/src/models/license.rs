//! License model.

use super::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the license was bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    /// Personal use only
    #[default]
    Use,
    /// Bought to resell in a later round
    Resell,
}

/// A license token bound to a product and an owner.
///
/// Created on purchase, transferred on resale, never deleted client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct License {
    /// Unique identifier
    pub id: String,
    /// Licensed product
    #[serde(alias = "productId")]
    pub product_id: String,
    /// Current owner
    #[serde(alias = "ownerId", alias = "userId", alias = "user_id")]
    pub owner_id: String,
    /// Activation key, when the backend exposes it
    #[serde(default, alias = "licenseKey", skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    /// Purchase intent
    #[serde(default, alias = "purchaseType")]
    pub purchase_type: PurchaseType,
    /// Whether the backend allows resale right now
    #[serde(default, alias = "isResaleEligible", alias = "resale_eligible")]
    pub is_resale_eligible: bool,
    /// Round the license was acquired in
    #[serde(default, alias = "roundAcquired", alias = "round")]
    pub round_acquired: u32,
    /// Purchase timestamp
    #[serde(default, alias = "purchasedAt", skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<DateTime<Utc>>,
    /// Embedded product, for list endpoints that join it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl License {
    /// Whether the owner can list this license for resale.
    pub fn can_resell(&self) -> bool {
        self.purchase_type == PurchaseType::Resell && self.is_resale_eligible
    }
}

/// Result of checking a license key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LicenseVerification {
    /// Whether the key is genuine and active
    pub valid: bool,
    /// Matching license, if valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}
