//! `/licenses/*` endpoints.

use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::models::LicenseVerification;
use marketplace_types::License;

pub fn licenses_key() -> QueryKey {
    query_key!["licenses"]
}

pub fn license_key(id: &str) -> QueryKey {
    query_key!["license", id]
}

pub struct LicensesApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> LicensesApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    /// Licenses owned by the signed-in user.
    pub async fn list(&self) -> ClientResult<Vec<License>> {
        self.ctx.query(licenses_key(), Resource::Licenses, "/licenses").await
    }

    pub async fn get(&self, id: &str) -> ClientResult<License> {
        self.ctx.query(license_key(id), Resource::Licenses, &format!("/licenses/{}", id)).await
    }

    /// Check a license key. Always hits the backend.
    pub async fn verify(&self, key: &str) -> ClientResult<LicenseVerification> {
        self.ctx.http().get(&format!("/licenses/verify/{}", key.trim())).await
    }
}
