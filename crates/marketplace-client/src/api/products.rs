//! `/products/*` endpoints.

use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::ClientResult;
use crate::query_key;
use marketplace_types::models::{PageQuery, ProductDraft};
use marketplace_types::{Paginated, Product};

pub fn products_key() -> QueryKey {
    query_key!["products"]
}

pub fn product_key(id: &str) -> QueryKey {
    query_key!["product", id]
}

pub fn my_products_key() -> QueryKey {
    query_key!["my-products"]
}

fn list_key(query: &PageQuery) -> QueryKey {
    query_key!["products", query.page, query.limit, query.search.as_deref().unwrap_or_default()]
}

pub struct ProductsApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, query: &PageQuery) -> ClientResult<Paginated<Product>> {
        self.ctx.query_with(list_key(query), Resource::Products, "/products", query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Product> {
        self.ctx.query(product_key(id), Resource::Products, &format!("/products/{}", id)).await
    }

    /// Products owned by the signed-in creator.
    pub async fn mine(&self) -> ClientResult<Vec<Product>> {
        self.ctx.query(my_products_key(), Resource::Products, "/products/mine").await
    }

    pub async fn create(&self, draft: &ProductDraft) -> ClientResult<Product> {
        let product: Product = self.ctx.http().post("/products", draft).await?;
        self.ctx.invalidate(&[products_key(), my_products_key()]);
        Ok(product)
    }

    pub async fn update(&self, id: &str, draft: &ProductDraft) -> ClientResult<Product> {
        let product: Product = self.ctx.http().put(&format!("/products/{}", id), draft).await?;
        self.ctx.invalidate(&[products_key(), my_products_key()]);
        self.ctx.cache().set(product_key(id), &product, Resource::Products.options());
        Ok(product)
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.ctx.http().delete::<()>(&format!("/products/{}", id)).await?;
        self.ctx.invalidate(&[products_key(), my_products_key(), product_key(id)]);
        Ok(())
    }
}
