//! Complete a password reset from the link in the reset email.
//!
//! Two link shapes are accepted:
//!
//! ```text
//! https://app.example.com/reset-password#access_token=..&refresh_token=..&type=recovery
//! https://app.example.com/reset-password?token=..
//! ```
//!
//! The first is a Supabase recovery session and is completed against
//! Supabase; the second is a backend token and goes to
//! `POST /auth/reset-password`.

use super::feedback::{ErrorSurface, Toast, ToastQueue};
use crate::auth::LOGIN_ROUTE;
use crate::client::Marketplace;
use crate::error::{ClientError, ClientResult};
use marketplace_types::validation::validate_new_password;
use marketplace_types::FormError;
use std::collections::HashMap;
use url::{form_urlencoded, Url};

pub const RESET_SUCCESS_MESSAGE: &str = "Password updated. Please log in with your new password.";

/// Token extracted from a reset link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryToken {
    Supabase { access_token: String, refresh_token: String },
    Backend { token: String },
}

impl RecoveryToken {
    /// Parse a full reset link. Fragment parameters take precedence over
    /// the query string.
    pub fn from_url(link: &str) -> ClientResult<Self> {
        let url = Url::parse(link.trim()).map_err(|_| FormError::InvalidResetLink)?;

        let fragment: HashMap<String, String> = url
            .fragment()
            .map(|f| form_urlencoded::parse(f.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        if let Some(description) =
            fragment.get("error_description").or_else(|| fragment.get("error"))
        {
            return Err(ClientError::Supabase { status: 401, message: description.clone() });
        }

        if let Some(access_token) = non_empty(fragment.get("access_token")) {
            if fragment.get("type").map(String::as_str) != Some("recovery") {
                return Err(FormError::InvalidResetLink.into());
            }
            let refresh_token = non_empty(fragment.get("refresh_token")).unwrap_or_default();
            return Ok(Self::Supabase { access_token, refresh_token });
        }

        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        non_empty(query.get("token").or_else(|| fragment.get("token")))
            .map(|token| Self::Backend { token })
            .ok_or_else(|| FormError::InvalidResetLink.into())
    }

    pub const fn is_supabase(&self) -> bool {
        matches!(self, Self::Supabase { .. })
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetState {
    Editing,
    Submitting,
    /// Password changed; the user should log in again
    Complete,
}

/// Reset-password form bound to one recovery link.
pub struct ResetPasswordFlow<'a> {
    ctx: &'a Marketplace,
    toasts: ToastQueue,
    token: RecoveryToken,
    state: ResetState,
    field_error: Option<String>,
}

impl<'a> ResetPasswordFlow<'a> {
    /// Fails when the link carries no usable token; the page should then
    /// offer to request a new email.
    pub fn new(ctx: &'a Marketplace, toasts: ToastQueue, link: &str) -> ClientResult<Self> {
        let token = RecoveryToken::from_url(link)?;
        Ok(Self { ctx, toasts, token, state: ResetState::Editing, field_error: None })
    }

    pub fn token(&self) -> &RecoveryToken {
        &self.token
    }

    pub fn state(&self) -> ResetState {
        self.state
    }

    pub fn field_error(&self) -> Option<&str> {
        self.field_error.as_deref()
    }

    /// Where to go once the reset is complete.
    pub fn redirect(&self) -> Option<&'static str> {
        (self.state == ResetState::Complete).then_some(LOGIN_ROUTE)
    }

    pub async fn submit(&mut self, password: &str, confirm: &str) -> ResetState {
        if self.state != ResetState::Editing {
            return self.state;
        }
        if let Err(e) = validate_new_password(password, confirm) {
            self.field_error = Some(e.to_string());
            return self.state;
        }
        self.field_error = None;
        self.state = ResetState::Submitting;

        match self.apply(password).await {
            Ok(()) => {
                tracing::info!("Password reset completed");
                self.toasts.push(Toast::success(RESET_SUCCESS_MESSAGE));
                self.state = ResetState::Complete;
            }
            Err(e) => {
                tracing::warn!("Password reset failed: {}", e);
                match ErrorSurface::for_error(&e) {
                    ErrorSurface::Inline => self.field_error = Some(e.user_friendly_message()),
                    _ => self.toasts.push(Toast::from_error(&e)),
                }
                self.state = ResetState::Editing;
            }
        }
        self.state
    }

    async fn apply(&self, password: &str) -> ClientResult<()> {
        match &self.token {
            RecoveryToken::Supabase { access_token, refresh_token } => {
                let supabase = self.ctx.require_supabase()?;
                supabase.set_session(access_token, refresh_token).await?;
                let result = supabase.update_password(password).await;
                // The recovery session is single-use either way.
                supabase.clear_session();
                result
            }
            RecoveryToken::Backend { token } => {
                self.ctx.auth().reset_password(token, password).await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supabase_hash_link() {
        let token = RecoveryToken::from_url(
            "https://app.example.com/reset-password#access_token=at-1&refresh_token=rt-1&expires_in=3600&type=recovery",
        )
        .unwrap();
        assert_eq!(
            token,
            RecoveryToken::Supabase {
                access_token: "at-1".to_string(),
                refresh_token: "rt-1".to_string(),
            }
        );
        assert!(token.is_supabase());
    }

    #[test]
    fn test_backend_query_link() {
        let token =
            RecoveryToken::from_url("https://app.example.com/reset-password?token=abc%2F123")
                .unwrap();
        assert_eq!(token, RecoveryToken::Backend { token: "abc/123".to_string() });
    }

    #[test]
    fn test_hash_must_be_recovery() {
        let err = RecoveryToken::from_url("https://app.example.com/#access_token=at&type=signup")
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(FormError::InvalidResetLink)));
    }

    #[test]
    fn test_link_without_token() {
        for link in [
            "https://app.example.com/reset-password",
            "https://app.example.com/?token=",
            "not a url",
        ] {
            let err = RecoveryToken::from_url(link).unwrap_err();
            assert!(err.is_validation(), "{link}");
        }
    }

    #[test]
    fn test_supabase_error_in_hash() {
        let err = RecoveryToken::from_url(
            "https://app.example.com/#error=access_denied&error_code=otp_expired&error_description=Email+link+is+invalid+or+has+expired",
        )
        .unwrap_err();
        assert_eq!(err.user_friendly_message(), "Email link is invalid or has expired");
    }
}
