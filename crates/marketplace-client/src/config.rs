//! Client configuration.

use crate::error::ClientError;

/// Base URL of the marketplace REST API.
pub const ENV_API_URL: &str = "NEXT_PUBLIC_API_URL";
/// Supabase project URL.
pub const ENV_SUPABASE_URL: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Supabase anonymous (public) key.
pub const ENV_SUPABASE_ANON_KEY: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for retry behavior on transient errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for the exponential delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, base_delay_ms: 1000, max_delay_ms: 30_000 }
    }
}

/// Connection details for the Supabase project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public anonymous key
    pub anon_key: String,
}

/// Configuration for the marketplace client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (no trailing slash).
    pub api_url: String,
    /// Supabase project, when asset storage and recovery links are used.
    pub supabase: Option<SupabaseConfig>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry configuration for cached queries.
    pub retry: RetryConfig,
    /// Clear the session when any request comes back 401.
    pub logout_on_unauthorized: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            supabase: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: RetryConfig::default(),
            logout_on_unauthorized: false,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with defaults elsewhere.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self { api_url: normalize_base(api_url.into()), ..Self::default() }
    }

    /// Read configuration from the process environment.
    ///
    /// `NEXT_PUBLIC_API_URL` is required. Supabase is enabled only when both
    /// of its variables are set and non-empty.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty(ENV_API_URL)
            .ok_or_else(|| ClientError::Config(format!("{} is not set", ENV_API_URL)))?;
        url::Url::parse(&api_url)
            .map_err(|e| {
                ClientError::Config(format!("{} is not a valid URL: {}", ENV_API_URL, e))
            })?;

        let supabase = match (non_empty(ENV_SUPABASE_URL), non_empty(ENV_SUPABASE_ANON_KEY)) {
            (Some(url), Some(anon_key)) => {
                Some(SupabaseConfig { url: normalize_base(url), anon_key })
            }
            _ => None,
        };

        Ok(Self { supabase, ..Self::new(api_url) })
    }

    /// Builder-style Supabase override.
    pub fn with_supabase(mut self, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.supabase =
            Some(SupabaseConfig { url: normalize_base(url.into()), anon_key: anon_key.into() });
        self
    }
}

fn normalize_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
