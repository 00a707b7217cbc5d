//! Product model.

use super::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Awaiting admin review
    #[default]
    Pending,
    /// Listed on the marketplace
    Approved,
    /// Rejected by an admin
    Rejected,
    /// Not yet submitted
    Draft,
}

impl ProductStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Draft => "draft",
        }
    }
}

/// A digital product sold as a fixed number of licenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier
    pub id: String,
    /// Display title
    #[serde(alias = "name")]
    pub title: String,
    /// Long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price per license
    pub price: f64,
    /// Licenses ever issued for this product
    #[serde(alias = "totalLicenses")]
    pub total_licenses: u32,
    /// Licenses still available in the current round
    #[serde(alias = "remainingLicenses")]
    pub remaining_licenses: u32,
    /// Commercial stage
    #[serde(alias = "currentStage")]
    pub current_stage: Stage,
    /// Resale round counter
    #[serde(default, alias = "currentRound")]
    pub current_round: u32,
    /// Moderation status
    #[serde(default)]
    pub status: ProductStatus,
    /// Owner of the product
    #[serde(default, alias = "creatorId", skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    /// Storage location of the deliverable
    #[serde(default, alias = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Storage location of the preview image
    #[serde(default, alias = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Creation timestamp
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Remaining licenses clamped to the total.
    pub fn remaining_clamped(&self) -> u32 {
        self.remaining_licenses.min(self.total_licenses)
    }

    /// Licenses sold so far.
    pub fn sold_licenses(&self) -> u32 {
        self.total_licenses - self.remaining_clamped()
    }

    /// Whether every license in the current round is gone.
    pub fn is_sold_out(&self) -> bool {
        self.remaining_clamped() == 0
    }
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductDraft {
    /// Display title
    pub title: String,
    /// Long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price per license
    pub price: f64,
    /// Number of licenses to issue
    pub total_licenses: u32,
    /// Storage path of the uploaded deliverable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Storage path of the uploaded preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Icon Pack",
            "price": 12.5,
            "totalLicenses": 100,
            "remainingLicenses": 40,
            "currentStage": "blossom",
            "currentRound": 2,
            "status": "approved"
        }))
        .unwrap();

        assert_eq!(product.title, "Icon Pack");
        assert_eq!(product.current_stage, Stage::Blossom);
        assert_eq!(product.current_round, 2);
        assert_eq!(product.sold_licenses(), 60);
        assert_eq!(product.status, ProductStatus::Approved);
    }

    #[test]
    fn test_remaining_clamped_to_total() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "p2",
            "title": "Broken",
            "price": 1.0,
            "total_licenses": 10,
            "remaining_licenses": 15,
            "current_stage": "newboom"
        }))
        .unwrap();

        assert_eq!(product.remaining_clamped(), 10);
        assert_eq!(product.sold_licenses(), 0);
        assert!(!product.is_sold_out());
    }
}
