//! # Marketplace Types
//!
//! Core types, API payloads, and display logic for the marketplace client.
//!
//! This crate provides the foundational type system shared by the SDK and CLI:
//!
//! - **`models`** - Backend-owned entities (Product, License, Badge, User, Payout)
//! - **`envelope`** - The `{success, message, data}` response wrapper
//! - **`error`** - Backend error payloads and human-readable formatting
//! - **`display`** - Stage badges, progress strings, pagination controls
//! - **`validation`** - Form checks run before a request is sent
//!
//! ## Architecture Role
//!
//! `marketplace-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          marketplace-types (this crate)
//!                   │
//!                   ▼
//!          marketplace-client
//!                   │
//!                   ▼
//!           marketplace-cli
//! ```
//!
//! Nothing here performs I/O. Every value is derived from fields the backend
//! already computed.

pub mod display;
pub mod envelope;
pub mod error;
pub mod models;
pub mod validation;

pub use envelope::ApiEnvelope;
pub use error::{format_error_message, ApiErrorBody, ValidationError, GENERIC_ERROR_MESSAGE};

pub use validation::FormError;

pub use models::{
    AuthTokens, Badge, BadgeProgress, BadgeTier, BadgeType, License, PageInfo, Paginated,
    Product, ProductStatus, PurchaseType, Role, Stage, User,
};
