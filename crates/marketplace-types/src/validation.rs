//! Client-side form checks run before a request is sent.

use thiserror::Error;

/// Minimum password length accepted by the reset and change forms.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Reasons a form cannot be submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field is blank
    #[error("{field} is required")]
    Required {
        /// Field label
        field: &'static str,
    },

    /// Email does not look like an address
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Password shorter than [`MIN_PASSWORD_LEN`]
    #[error("Password must be at least {min} characters")]
    PasswordTooShort {
        /// Required length
        min: usize,
    },

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Reset link carries no usable token
    #[error("Invalid or expired reset link. Please request a new one.")]
    InvalidResetLink,
}

/// Check that `email` is non-blank and shaped like `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::Required { field: "Email" });
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(FormError::InvalidEmail);
    };
    let domain_ok = domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

/// Check a new password and its confirmation.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), FormError> {
    if password.is_empty() {
        return Err(FormError::Required { field: "Password" });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    if password != confirm {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("buyer@example.com").is_ok());
        assert!(validate_email("  buyer@example.com ").is_ok());
        assert_eq!(validate_email(""), Err(FormError::Required { field: "Email" }));
        assert_eq!(validate_email("buyer"), Err(FormError::InvalidEmail));
        assert_eq!(validate_email("@example.com"), Err(FormError::InvalidEmail));
        assert_eq!(validate_email("buyer@example"), Err(FormError::InvalidEmail));
        assert_eq!(validate_email("bu yer@example.com"), Err(FormError::InvalidEmail));
    }

    #[test]
    fn test_validate_new_password() {
        assert!(validate_new_password("s3cret-pass", "s3cret-pass").is_ok());
        assert_eq!(
            validate_new_password("short", "short"),
            Err(FormError::PasswordTooShort { min: 8 })
        );
        assert_eq!(
            validate_new_password("long-enough", "long-enougH"),
            Err(FormError::PasswordMismatch)
        );
        assert_eq!(validate_new_password("", ""), Err(FormError::Required { field: "Password" }));
    }

    #[test]
    fn test_messages() {
        assert_eq!(FormError::InvalidEmail.to_string(), "Please enter a valid email address");
        assert_eq!(FormError::Required { field: "Email" }.to_string(), "Email is required");
    }
}
