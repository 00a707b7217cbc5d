#![doc = include_str!("../README.md")]

pub mod api;
pub mod auth;
pub mod cache;
mod client;
pub mod config;
mod error;
pub mod flows;
pub mod guard;
mod http;
pub mod preferences;
pub mod retry;
pub mod storage;
pub mod supabase;

pub use auth::{AuthSession, AuthSnapshot, AuthState, LOGIN_ROUTE};
pub use cache::{QueryCache, QueryKey, QueryOptions, Resource};
pub use client::Marketplace;
pub use config::{ClientConfig, RetryConfig, SupabaseConfig};
pub use error::{ClientError, ClientResult};
pub use guard::{home_route, GuardDecision, RouteGuard, ADMIN_DASHBOARD, USER_DASHBOARD};
pub use http::{ApiClient, UnauthorizedHook};
pub use preferences::{Preferences, Settings, Theme};
pub use retry::RetryPolicy;
pub use storage::{FileStore, MemoryStore, SessionStore, StorageKey};
pub use supabase::{SupabaseClient, SupabaseSession};
