//! Retry policy for cached queries.
//!
//! The HTTP wrapper never retries. The query cache consults a
//! [`RetryPolicy`] after each failed fetch.

use crate::config::RetryConfig;
use crate::error::ClientError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether an error is worth another attempt.
pub type RetryPredicate = Arc<dyn Fn(&ClientError) -> bool + Send + Sync>;

/// Retry 5xx, network and timeout failures; never 4xx or local errors.
pub fn retry_unless_client_error(err: &ClientError) -> bool {
    match err {
        ClientError::Network(_) | ClientError::Timeout(_) => true,
        ClientError::Api { .. } | ClientError::Supabase { .. } => err.is_server_error(),
        ClientError::Decode(_)
        | ClientError::Config(_)
        | ClientError::Storage(_)
        | ClientError::Validation(_) => false,
    }
}

/// Bounded exponential backoff with a configurable predicate.
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    predicate: RetryPredicate,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config, predicate: Arc::new(retry_unless_client_error) }
    }

    /// Never retry.
    pub fn none() -> Self {
        Self::new(RetryConfig { max_retries: 0, ..RetryConfig::default() })
    }

    /// Replace the predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ClientError) -> bool + Send + Sync + 'static,
    {
        self.predicate = Arc::new(predicate);
        self
    }

    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// `failures` counts failed attempts so far, including this one.
    pub fn should_retry(&self, err: &ClientError, failures: u32) -> bool {
        failures <= self.config.max_retries && (self.predicate)(err)
    }

    /// Delay before the retry following the `failures`-th failure.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exp = failures.saturating_sub(1).min(31);
        let delay = self.config.base_delay_ms.saturating_mul(1u64 << exp);
        Duration::from_millis(delay.min(self.config.max_delay_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketplace_types::ApiErrorBody;

    fn api(status: u16) -> ClientError {
        ClientError::Api { status, body: ApiErrorBody::default() }
    }

    #[test]
    fn test_default_predicate() {
        assert!(!retry_unless_client_error(&api(400)));
        assert!(!retry_unless_client_error(&api(401)));
        assert!(!retry_unless_client_error(&api(404)));
        assert!(retry_unless_client_error(&api(500)));
        assert!(retry_unless_client_error(&api(503)));
        assert!(retry_unless_client_error(&ClientError::Timeout(10)));
        assert!(retry_unless_client_error(&ClientError::Network("reset".to_string())));
        assert!(!retry_unless_client_error(&ClientError::Decode("eof".to_string())));
    }

    #[test]
    fn test_capped_at_three_retries() {
        let policy = RetryPolicy::default();
        let err = api(502);
        assert!(policy.should_retry(&err, 1));
        assert!(policy.should_retry(&err, 3));
        assert!(!policy.should_retry(&err, 4));
    }

    #[test]
    fn test_exponential_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(10), Duration::from_millis(30_000));
    }

    #[test]
    fn test_custom_predicate() {
        let policy = RetryPolicy::default().with_predicate(|e| e.status() == Some(409));
        assert!(policy.should_retry(&api(409), 1));
        assert!(!policy.should_retry(&api(500), 1));
    }
}
