//! `/auth/*` endpoints.

use crate::cache::{QueryKey, Resource};
use crate::client::Marketplace;
use crate::error::{ClientError, ClientResult};
use crate::query_key;
use marketplace_types::models::AuthPayload;
use marketplace_types::User;
use serde::Serialize;

pub fn current_user_key() -> QueryKey {
    query_key!["current-user"]
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    #[serde(rename = "referralCode", skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetRequest<'a> {
    token: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

pub struct AuthApi<'a> {
    ctx: &'a Marketplace,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(ctx: &'a Marketplace) -> Self {
        Self { ctx }
    }

    /// Sign in and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let payload: AuthPayload =
            self.ctx.http().post("/auth/login", &LoginRequest { email, password }).await?;
        if payload.tokens.is_none() {
            return Err(ClientError::Decode("login response carried no token".to_string()));
        }
        self.establish(payload)
    }

    /// Create an account. The session is established only when the backend
    /// issues tokens right away (no email verification step).
    pub async fn register(&self, request: &RegisterRequest<'_>) -> ClientResult<User> {
        let payload: AuthPayload = self.ctx.http().post("/auth/register", request).await?;
        if payload.tokens.is_some() {
            self.establish(payload)
        } else {
            Ok(payload.user)
        }
    }

    /// Current user, cached for five minutes.
    pub async fn current_user(&self) -> ClientResult<User> {
        let user: User =
            self.ctx.query(current_user_key(), Resource::CurrentUser, "/auth/me").await?;
        self.ctx.session().update_user(user.clone())?;
        Ok(user)
    }

    /// Ask the backend to email a reset link. One POST, no caching.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        self.ctx.http().post("/auth/forgot-password", &EmailRequest { email }).await
    }

    /// Complete a backend-issued reset link.
    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        self.ctx.http().post("/auth/reset-password", &ResetRequest { token, password }).await
    }

    pub async fn verify_email(&self, token: &str) -> ClientResult<()> {
        self.ctx.http().post::<_, ()>("/auth/verify-email", &TokenRequest { token }).await?;
        self.ctx.invalidate(&[current_user_key()]);
        Ok(())
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ClientResult<()> {
        let request = ChangePasswordRequest { current_password, new_password };
        self.ctx.http().post("/auth/change-password", &request).await
    }

    /// Tell the backend (best effort), then clear session and cache.
    /// Returns the route to redirect to.
    pub async fn logout(&self) -> &'static str {
        if self.ctx.session().is_authenticated() {
            if let Err(e) = self.ctx.http().post_empty::<()>("/auth/logout").await {
                tracing::debug!("Server-side logout failed, clearing locally anyway: {}", e);
            }
        }
        if let Some(supabase) = self.ctx.supabase() {
            supabase.clear_session();
        }
        self.ctx.cache().clear();
        self.ctx.session().logout()
    }

    fn establish(&self, payload: AuthPayload) -> ClientResult<User> {
        let Some(tokens) = payload.tokens else {
            return Ok(payload.user);
        };
        // Another user's cached data must not leak into this session.
        self.ctx.cache().clear();
        self.ctx.session().sign_in(&tokens, payload.user.clone())?;
        Ok(payload.user)
    }
}
