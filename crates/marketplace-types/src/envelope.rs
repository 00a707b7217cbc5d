//! The `{success, message, data}` wrapper every backend response uses.

use serde::{Deserialize, Serialize};

use crate::error::{ApiErrorBody, ValidationError};

/// Raw response envelope as sent by the backend.
///
/// Decode it once at the HTTP boundary with [`ApiEnvelope::into_result`] and
/// never inspect the raw shape downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the call successful
    #[serde(default)]
    pub success: bool,
    /// Optional human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload; absent on most failures
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Validation errors some endpoints attach to failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl<T> ApiEnvelope<T> {
    /// Turn the envelope into an explicit result.
    ///
    /// `success: true` without `data` yields `Err` only when `T` cannot be
    /// represented by an absent payload; callers that expect no payload use
    /// `ApiEnvelope<Option<U>>` or `ApiEnvelope<serde_json::Value>`.
    pub fn into_result(self) -> Result<Option<T>, ApiErrorBody> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiErrorBody { success: false, message: self.message, errors: self.errors })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_data() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_success_without_data() {
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"Email sent"}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), None);
    }

    #[test]
    fn test_failure_keeps_message_and_errors() {
        let env: ApiEnvelope<serde_json::Value> = serde_json::from_str(
            r#"{"success":false,"message":"Validation failed","errors":["Email is required"]}"#,
        )
        .unwrap();
        let err = env.into_result().unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Validation failed"));
        assert_eq!(err.first_validation_error(), Some("Email is required"));
    }
}
