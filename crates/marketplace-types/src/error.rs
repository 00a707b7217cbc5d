//! Backend error payloads.
//!
//! Failed requests carry `{success: false, message, errors?}`. The `errors`
//! array is loosely typed on the wire: entries are either bare strings or
//! objects with a `message` (or `msg`) and an optional `field`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shown when neither a validation error nor a message is available.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ValidationError {
    /// `"email is required"`
    Text(String),
    /// `{"field": "email", "message": "is required"}`
    Field {
        /// Name of the offending field, if the backend reported one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        /// Human-readable description
        #[serde(alias = "msg")]
        message: String,
    },
}

impl ValidationError {
    /// The human-readable part of the error.
    pub fn message(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Field { message, .. } => message,
        }
    }

    /// Field name, when present.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Field { field, .. } => field.as_deref(),
        }
    }
}

/// Error payload returned by the backend for failed requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    /// Always `false` for error payloads
    #[serde(default)]
    pub success: bool,
    /// Top-level business-rule message (e.g. "insufficient credits")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl ApiErrorBody {
    /// Build a body carrying only a top-level message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), errors: None }
    }

    /// First validation error whose text is not blank.
    pub fn first_validation_error(&self) -> Option<&str> {
        self.errors
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ValidationError::message)
            .find(|m| !m.trim().is_empty())
    }

    /// Top-level message exactly as sent, if not blank.
    pub fn non_blank_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// Whether the payload carries any displayable text at all.
    pub fn has_text(&self) -> bool {
        self.first_validation_error().is_some() || self.non_blank_message().is_some()
    }

    /// Whether the payload is a validation failure (field errors present).
    pub fn is_validation(&self) -> bool {
        self.first_validation_error().is_some()
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_error_message(self))
    }
}

impl std::error::Error for ApiErrorBody {}

/// Render an error payload as a single non-empty, human-readable line.
///
/// Prefers the first validation error, then the top-level message, then
/// [`GENERIC_ERROR_MESSAGE`].
pub fn format_error_message(body: &ApiErrorBody) -> String {
    body.first_validation_error()
        .or_else(|| body.non_blank_message())
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_string()
}
