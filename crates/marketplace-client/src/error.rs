//! Error types for the marketplace client.

use marketplace_types::{
    format_error_message, ApiErrorBody, FormError, ValidationError, GENERIC_ERROR_MESSAGE,
};
use thiserror::Error;

/// Errors that can occur when using the marketplace client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to reach the server (DNS, refused connection, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the client-side timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Backend answered with a failure, either a non-2xx status or
    /// `success: false`.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Decoded error payload
        body: ApiErrorBody,
    },

    /// Response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Supabase auth or storage call failed.
    #[error("Supabase error ({status}): {message}")]
    Supabase {
        /// HTTP status code, 0 when the request never completed
        status: u16,
        /// Error description from Supabase
        message: String,
    },

    /// Form input rejected before sending.
    #[error(transparent)]
    Validation(#[from] FormError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(0)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl ClientError {
    /// Map a reqwest failure, reporting timeouts against the configured limit.
    pub(crate) fn transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::from(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl ClientError {
    /// HTTP status, when the failure came from a response.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Supabase { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 4xx response.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// 5xx response.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }

    /// 401 response.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Network or timeout failure.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// Backend payload, when the failure carried one.
    pub const fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Field-level errors reported by the backend.
    pub fn validation_errors(&self) -> &[ValidationError] {
        self.body().and_then(|b| b.errors.as_deref()).unwrap_or_default()
    }

    /// Whether this failure belongs next to a form field.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_)) || self.body().is_some_and(ApiErrorBody::is_validation)
    }

    /// Non-empty text suitable for a toast or inline alert.
    ///
    /// Backend text wins when present; otherwise the status or transport
    /// failure picks a canned message.
    pub fn user_friendly_message(&self) -> String {
        if let Some(body) = self.body().filter(|b| b.has_text()) {
            return format_error_message(body);
        }

        let canned = match self {
            Self::Validation(err) => return err.to_string(),
            Self::Network(_) => "Unable to reach the server. Please check your connection.",
            Self::Timeout(_) => "The request timed out. Please try again.",
            Self::Supabase { message, .. } if !message.trim().is_empty() => {
                return message.clone();
            }
            _ => match self.status() {
                Some(401) => "Your session has expired. Please log in again.",
                Some(403) => "You do not have permission to perform this action.",
                Some(404) => "The requested resource was not found.",
                Some(429) => "Too many requests. Please wait a moment and try again.",
                Some(s) if s >= 500 => "The server encountered an error. Please try again later.",
                _ => GENERIC_ERROR_MESSAGE,
            },
        };
        canned.to_string()
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, body: ApiErrorBody) -> ClientError {
        ClientError::Api { status, body }
    }

    #[test]
    fn test_backend_text_wins() {
        let err = api(400, ApiErrorBody::with_message("Insufficient credits"));
        assert_eq!(err.user_friendly_message(), "Insufficient credits");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_status_fallbacks() {
        let err = api(401, ApiErrorBody::default());
        assert!(err.is_unauthorized());
        assert_eq!(err.user_friendly_message(), "Your session has expired. Please log in again.");

        let err = api(503, ApiErrorBody::with_message("   "));
        assert_eq!(
            err.user_friendly_message(),
            "The server encountered an error. Please try again later."
        );

        let err = api(418, ApiErrorBody::default());
        assert_eq!(err.user_friendly_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_transport_and_local_errors_are_non_empty() {
        let errors = [
            ClientError::Network("refused".to_string()),
            ClientError::Timeout(10),
            ClientError::Decode("eof".to_string()),
            ClientError::Config("missing".to_string()),
            ClientError::Storage("denied".to_string()),
            ClientError::Supabase { status: 0, message: String::new() },
            ClientError::Validation(FormError::InvalidEmail),
        ];
        for err in errors {
            assert!(!err.user_friendly_message().trim().is_empty(), "{:?}", err);
        }
    }

    #[test]
    fn test_validation_detection() {
        let body = ApiErrorBody {
            success: false,
            message: Some("Validation failed".to_string()),
            errors: Some(vec![marketplace_types::ValidationError::Text(
                "Title is required".to_string(),
            )]),
        };
        let err = api(422, body);
        assert!(err.is_validation());
        assert_eq!(err.user_friendly_message(), "Title is required");
        assert!(ClientError::Validation(FormError::PasswordMismatch).is_validation());
    }
}
