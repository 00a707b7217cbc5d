//! Request a password reset email.

use super::feedback::{ErrorSurface, Toast, ToastQueue};
use crate::client::Marketplace;
use marketplace_types::validation::validate_email;

/// Message shown once the reset email has been requested.
pub const CHECK_EMAIL_MESSAGE: &str =
    "If an account exists for that email, a reset link is on its way.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
    /// Form accepts input
    Editing,
    /// Request in flight, submit disabled
    Submitting,
    /// Request accepted; show the check-your-inbox screen
    CheckEmail,
}

/// Forgot-password form.
///
/// Invalid input never reaches the network. A valid submit sends exactly
/// one request; a second submit while one is in flight is ignored.
pub struct ForgotPasswordFlow<'a> {
    ctx: &'a Marketplace,
    toasts: ToastQueue,
    state: FormState,
    email: String,
    field_error: Option<String>,
}

impl<'a> ForgotPasswordFlow<'a> {
    pub fn new(ctx: &'a Marketplace, toasts: ToastQueue) -> Self {
        Self { ctx, toasts, state: FormState::Editing, email: String::new(), field_error: None }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        if self.state == FormState::Editing {
            self.email = email.into();
            self.field_error = None;
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Inline error under the email field.
    pub fn field_error(&self) -> Option<&str> {
        self.field_error.as_deref()
    }

    pub async fn submit(&mut self) -> FormState {
        if self.state != FormState::Editing {
            return self.state;
        }
        if let Err(e) = validate_email(&self.email) {
            self.field_error = Some(e.to_string());
            return self.state;
        }

        self.state = FormState::Submitting;
        let email = self.email.trim().to_string();
        match self.ctx.auth().forgot_password(&email).await {
            Ok(()) => {
                tracing::info!("Password reset requested");
                self.toasts.push(Toast::success(CHECK_EMAIL_MESSAGE));
                self.state = FormState::CheckEmail;
            }
            Err(e) => {
                tracing::warn!("Password reset request failed: {}", e);
                match ErrorSurface::for_error(&e) {
                    ErrorSurface::Inline => self.field_error = Some(e.user_friendly_message()),
                    _ => self.toasts.push(Toast::from_error(&e)),
                }
                self.state = FormState::Editing;
            }
        }
        self.state
    }

    /// Back to the form, e.g. "try a different email".
    pub fn start_over(&mut self) {
        self.state = FormState::Editing;
        self.field_error = None;
    }
}
