//! `/payouts/*` endpoints and Stripe Connect onboarding.

use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::models::{ConnectStatus, OnboardingLink, Payout};
use serde::Serialize;

pub fn payouts_key() -> QueryKey {
    query_key!["payouts"]
}

pub fn connect_status_key() -> QueryKey {
    query_key!["connect-status"]
}

#[derive(Debug, Serialize)]
struct PayoutRequest {
    amount: f64,
}

pub struct PayoutsApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> PayoutsApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> ClientResult<Vec<Payout>> {
        self.ctx.query(payouts_key(), Resource::Payouts, "/payouts").await
    }

    pub async fn request(&self, amount: f64) -> ClientResult<Payout> {
        let payout: Payout =
            self.ctx.http().post("/payouts/request", &PayoutRequest { amount }).await?;
        self.ctx.invalidate(&[payouts_key()]);
        Ok(payout)
    }

    pub async fn connect_status(&self) -> ClientResult<ConnectStatus> {
        self.ctx.query(connect_status_key(), Resource::Payouts, "/payouts/connect/status").await
    }

    /// Start Stripe onboarding. The status is refetched once the user returns.
    pub async fn onboarding_link(&self) -> ClientResult<OnboardingLink> {
        let link: OnboardingLink = self.ctx.http().post_empty("/payouts/connect/onboard").await?;
        self.ctx.invalidate(&[connect_status_key()]);
        Ok(link)
    }

    /// New link for an onboarding session that expired.
    pub async fn refresh_link(&self) -> ClientResult<OnboardingLink> {
        let link: OnboardingLink = self.ctx.http().post_empty("/payouts/connect/refresh").await?;
        self.ctx.invalidate(&[connect_status_key()]);
        Ok(link)
    }
}
