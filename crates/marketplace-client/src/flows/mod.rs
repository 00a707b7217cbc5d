//! Form flows as explicit state machines: validate locally, submit once,
//! report through inline errors or toasts.

mod feedback;
mod forgot_password;
mod reset_password;

pub use feedback::{ErrorSurface, Toast, ToastLevel, ToastQueue};
pub use forgot_password::{ForgotPasswordFlow, FormState, CHECK_EMAIL_MESSAGE};
pub use reset_password::{RecoveryToken, ResetPasswordFlow, ResetState, RESET_SUCCESS_MESSAGE};
