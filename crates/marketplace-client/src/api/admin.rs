//! `/admin/*` endpoints. The backend enforces the admin role; callers
//! should still gate on [`RouteGuard::admin_only`](crate::guard::RouteGuard::admin_only).

use super::products::{product_key, products_key};
use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::models::{AdminStats, PageQuery};
use marketplace_types::{Paginated, Product, ProductStatus, User};
use serde::{Deserialize, Serialize};

pub fn admin_stats_key() -> QueryKey {
    query_key!["admin-stats"]
}

pub fn admin_products_key() -> QueryKey {
    query_key!["admin-products"]
}

pub fn admin_product_key(id: &str) -> QueryKey {
    query_key!["admin-product", id]
}

pub fn admin_users_key() -> QueryKey {
    query_key!["admin-users"]
}

/// Account state an admin can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

/// User row in the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub status: AccountStatus,
}

#[derive(Debug, Serialize)]
struct AdminProductQuery<'a> {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RejectRequest<'a> {
    reason: &'a str,
}

#[derive(Debug, Serialize)]
struct StatusRequest {
    status: AccountStatus,
}

pub struct AdminApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    pub async fn stats(&self) -> ClientResult<AdminStats> {
        self.ctx.query(admin_stats_key(), Resource::Admin, "/admin/stats").await
    }

    /// Products filtered by moderation status; `None` lists all.
    pub async fn products(
        &self,
        status: Option<ProductStatus>,
        page: &PageQuery,
    ) -> ClientResult<Paginated<Product>> {
        let key = query_key![
            "admin-products",
            status.map(|s| s.as_str()).unwrap_or_default(),
            page.page,
            page.limit,
            page.search.as_deref().unwrap_or_default()
        ];
        let params = AdminProductQuery {
            page: page.page,
            limit: page.limit,
            status,
            search: page.search.as_deref(),
        };
        self.ctx.query_with(key, Resource::Admin, "/admin/products", &params).await
    }

    pub async fn product(&self, id: &str) -> ClientResult<Product> {
        self.ctx
            .query(admin_product_key(id), Resource::Admin, &format!("/admin/products/{}", id))
            .await
    }

    pub async fn approve(&self, id: &str) -> ClientResult<Product> {
        let product: Product =
            self.ctx.http().post_empty(&format!("/admin/products/{}/approve", id)).await?;
        self.after_moderation(id);
        Ok(product)
    }

    pub async fn reject(&self, id: &str, reason: &str) -> ClientResult<Product> {
        let product: Product = self
            .ctx
            .http()
            .post(&format!("/admin/products/{}/reject", id), &RejectRequest { reason })
            .await?;
        self.after_moderation(id);
        Ok(product)
    }

    pub async fn users(&self, page: &PageQuery) -> ClientResult<Paginated<AdminUser>> {
        let key = query_key![
            "admin-users",
            page.page,
            page.limit,
            page.search.as_deref().unwrap_or_default()
        ];
        self.ctx.query_with(key, Resource::Admin, "/admin/users", page).await
    }

    pub async fn set_user_status(
        &self,
        user_id: &str,
        status: AccountStatus,
    ) -> ClientResult<AdminUser> {
        let user: AdminUser = self
            .ctx
            .http()
            .patch(&format!("/admin/users/{}/status", user_id), &StatusRequest { status })
            .await?;
        self.ctx.invalidate(&[admin_users_key(), admin_stats_key()]);
        Ok(user)
    }

    fn after_moderation(&self, id: &str) {
        self.ctx.invalidate(&[
            admin_products_key(),
            admin_product_key(id),
            admin_stats_key(),
            products_key(),
            product_key(id),
        ]);
    }
}
