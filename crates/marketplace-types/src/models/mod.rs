//! Backend-owned entities.
//!
//! The client only deserializes and renders these; it never owns their
//! lifecycle.

mod badge;
mod license;
mod page;
mod payout;
mod product;
mod stage;
mod user;

pub use badge::{Badge, BadgeProgress, BadgeTier, BadgeType};
pub use license::{License, LicenseVerification, PurchaseType};
pub use page::{PageInfo, PageQuery, Paginated};
pub use payout::{
    AdminStats, ConnectStatus, OnboardingLink, Payout, PayoutStatus, ReferralCode, ReferralStats,
};
pub use product::{Product, ProductDraft, ProductStatus};
pub use stage::Stage;
pub use user::{AuthPayload, AuthTokens, Role, User};
