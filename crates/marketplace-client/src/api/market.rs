//! `/marketplace/*` endpoints: listings, purchases and resale.

use super::auth::current_user_key;
use super::licenses::licenses_key;
use super::products::product_key;
use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::{License, Paginated, Product, PurchaseType, Stage};
use serde::{Deserialize, Serialize};

pub fn marketplace_key() -> QueryKey {
    query_key!["marketplace"]
}

/// Listing filter.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListingQuery {
    pub fn page(page: u32) -> Self {
        Self { page: page.max(1), limit: 12, ..Self::default() }
    }
}

#[derive(Debug, Serialize)]
struct PurchaseRequest<'a> {
    product_id: &'a str,
    purchase_type: PurchaseType,
}

#[derive(Debug, Serialize)]
struct ResellRequest<'a> {
    license_id: &'a str,
    price: f64,
}

/// What a purchase returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseReceipt {
    pub license: License,
    /// Credits left after the purchase
    #[serde(default, alias = "remainingCredits")]
    pub remaining_credits: Option<f64>,
}

pub struct MarketApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> MarketApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    pub async fn listings(&self, query: &ListingQuery) -> ClientResult<Paginated<Product>> {
        let key = query_key![
            "marketplace",
            query.page,
            query.limit,
            query.stage.as_ref().map(Stage::as_str).unwrap_or_default(),
            query.search.as_deref().unwrap_or_default()
        ];
        self.ctx.query_with(key, Resource::Marketplace, "/marketplace/listings", query).await
    }

    /// Buy one license of `product_id`.
    pub async fn purchase(
        &self,
        product_id: &str,
        purchase_type: PurchaseType,
    ) -> ClientResult<PurchaseReceipt> {
        let receipt: PurchaseReceipt = self
            .ctx
            .http()
            .post("/marketplace/purchase", &PurchaseRequest { product_id, purchase_type })
            .await?;
        self.ctx.invalidate(&[
            marketplace_key(),
            licenses_key(),
            product_key(product_id),
            current_user_key(),
        ]);
        Ok(receipt)
    }

    /// Offer an owned license in the current resale round.
    pub async fn resell(&self, license_id: &str, price: f64) -> ClientResult<License> {
        let license: License = self
            .ctx
            .http()
            .post("/marketplace/resell", &ResellRequest { license_id, price })
            .await?;
        self.ctx.invalidate(&[licenses_key(), marketplace_key()]);
        Ok(license)
    }
}
