//! `/badges/*` endpoints.

use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::{Badge, BadgeProgress};

pub fn badges_key() -> QueryKey {
    query_key!["badges"]
}

pub fn badge_progress_key() -> QueryKey {
    query_key!["badge-progress"]
}

pub struct BadgesApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> BadgesApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    /// Badges earned by the signed-in user.
    pub async fn list(&self) -> ClientResult<Vec<Badge>> {
        self.ctx.query(badges_key(), Resource::Badges, "/badges").await
    }

    /// Progress towards every badge type.
    pub async fn progress(&self) -> ClientResult<Vec<BadgeProgress>> {
        self.ctx.query(badge_progress_key(), Resource::Badges, "/badges/progress").await
    }
}
