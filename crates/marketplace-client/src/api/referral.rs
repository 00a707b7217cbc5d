//! `/referral/*` endpoints.

use super::auth::current_user_key;
use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::models::{ReferralCode, ReferralStats};
use serde::Serialize;

pub fn referral_code_key() -> QueryKey {
    query_key!["referral-code"]
}

pub fn referral_stats_key() -> QueryKey {
    query_key!["referral-stats"]
}

#[derive(Debug, Serialize)]
struct ApplyRequest<'a> {
    code: &'a str,
}

pub struct ReferralApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> ReferralApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    pub async fn code(&self) -> ClientResult<ReferralCode> {
        self.ctx.query(referral_code_key(), Resource::Referral, "/referral/code").await
    }

    pub async fn stats(&self) -> ClientResult<ReferralStats> {
        self.ctx.query(referral_stats_key(), Resource::Referral, "/referral/stats").await
    }

    /// Attach someone else's referral code to the current account.
    pub async fn apply(&self, code: &str) -> ClientResult<()> {
        self.ctx
            .http()
            .post::<_, ()>("/referral/apply", &ApplyRequest { code: code.trim() })
            .await?;
        self.ctx.invalidate(&[referral_stats_key(), current_user_key()]);
        Ok(())
    }
}
