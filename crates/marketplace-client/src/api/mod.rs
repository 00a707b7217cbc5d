//! Typed endpoint groups. Each borrows the [`Marketplace`](crate::Marketplace)
//! it was obtained from; reads go through the query cache, writes invalidate
//! the keys they affect.

mod admin;
mod auth;
mod badges;
mod licenses;
mod market;
mod payouts;
mod products;
mod referral;

pub use admin::{
    admin_product_key, admin_products_key, admin_stats_key, admin_users_key, AccountStatus,
    AdminApi, AdminUser,
};
pub use auth::{current_user_key, AuthApi, LoginRequest, RegisterRequest};
pub use badges::{badge_progress_key, badges_key, BadgesApi};
pub use licenses::{license_key, licenses_key, LicensesApi};
pub use market::{marketplace_key, ListingQuery, MarketApi, PurchaseReceipt};
pub use payouts::{connect_status_key, payouts_key, PayoutsApi};
pub use products::{my_products_key, product_key, products_key, ProductsApi};
pub use referral::{referral_code_key, referral_stats_key, ReferralApi};
