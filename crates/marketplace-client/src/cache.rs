//! Server-state cache.
//!
//! Reads are keyed by a [`QueryKey`] (resource name followed by its
//! parameters). A fresh entry is served without a request; a stale or
//! missing one is fetched under a per-key lock so identical in-flight
//! queries collapse into one request. Mutations mark keys stale by exact
//! match or by prefix. The backend stays the source of truth: stale times
//! only trade freshness for fewer requests.

use crate::error::ClientResult;
use crate::retry::RetryPolicy;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Build a [`QueryKey`] from displayable segments.
///
/// ```
/// use marketplace_client::query_key;
/// let key = query_key!["admin-product", 42];
/// assert_eq!(key.to_string(), r#"["admin-product","42"]"#);
/// ```
#[macro_export]
macro_rules! query_key {
    ($($segment:expr),* $(,)?) => {
        $crate::cache::QueryKey::from_segments(vec![
            $(::std::string::ToString::to_string(&$segment)),*
        ])
    };
}

/// Identity of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segment-wise prefix match.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:?}", segment)?;
        }
        f.write_str("]")
    }
}

/// Freshness and retention windows for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a result is served without refetching.
    pub stale_time: Duration,
    /// How long an unused entry is kept before [`QueryCache::gc`] drops it.
    pub gc_time: Duration,
}

/// Retention for unused entries.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(10 * 60);

impl QueryOptions {
    pub const fn stale_minutes(minutes: u64) -> Self {
        Self { stale_time: Duration::from_secs(minutes * 60), gc_time: DEFAULT_GC_TIME }
    }

    /// Always refetch, keep the last value around for `get`.
    pub const fn always_stale() -> Self {
        Self { stale_time: Duration::ZERO, gc_time: DEFAULT_GC_TIME }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::stale_minutes(5)
    }
}

/// Per-resource freshness presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    CurrentUser,
    Products,
    Marketplace,
    Licenses,
    Badges,
    Referral,
    Admin,
    Payouts,
}

impl Resource {
    pub const fn options(self) -> QueryOptions {
        match self {
            Self::Marketplace | Self::Admin | Self::Payouts => QueryOptions::stale_minutes(2),
            Self::CurrentUser | Self::Products | Self::Licenses => QueryOptions::stale_minutes(5),
            Self::Badges | Self::Referral => QueryOptions::stale_minutes(10),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    updated_at: Instant,
    last_access: Instant,
    options: QueryOptions,
    invalidated: bool,
}

impl Entry {
    fn is_fresh(&self) -> bool {
        !self.invalidated && self.updated_at.elapsed() < self.options.stale_time
    }
}

/// Query cache shared by every endpoint API.
pub struct QueryCache {
    entries: DashMap<QueryKey, Entry>,
    in_flight: DashMap<QueryKey, Arc<Mutex<()>>>,
    retry: RetryPolicy,
}

impl QueryCache {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { entries: DashMap::new(), in_flight: DashMap::new(), retry }
    }

    /// Serve `key` from cache when fresh, otherwise run `fetcher`.
    ///
    /// Concurrent calls for the same key wait on one lock; whoever comes
    /// second sees the first caller's stored result. Failures are retried per
    /// the cache's [`RetryPolicy`] and are never cached.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> ClientResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(value) = self.fresh(&key) {
            tracing::trace!("cache hit {}", key);
            return Ok(value);
        }

        let lock = self.in_flight.entry(key.clone()).or_default().clone();
        let _guard = lock.lock().await;

        if let Some(value) = self.fresh(&key) {
            tracing::trace!("cache hit {} after waiting for in-flight fetch", key);
            return Ok(value);
        }

        let mut failures = 0u32;
        let value = loop {
            match fetcher().await {
                Ok(value) => break value,
                Err(err) => {
                    failures += 1;
                    if !self.retry.should_retry(&err, failures) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for(failures);
                    tracing::warn!(
                        "Query {} failed ({}), retry {} in {:?}",
                        key,
                        err,
                        failures,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        };

        self.set(key, &value, options);
        Ok(value)
    }

    /// Cached value regardless of freshness.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut entry = self.entries.get_mut(key)?;
        entry.last_access = Instant::now();
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Store a value directly, e.g. after a mutation returned the new state.
    ///
    /// Every write first sweeps entries past their gc time.
    pub fn set<T: Serialize>(&self, key: QueryKey, value: &T, options: QueryOptions) {
        let dropped = self.gc();
        if dropped > 0 {
            tracing::trace!("Dropped {} unused queries", dropped);
        }
        match serde_json::to_value(value) {
            Ok(value) => {
                let now = Instant::now();
                self.entries.insert(
                    key,
                    Entry { value, updated_at: now, last_access: now, options, invalidated: false },
                );
            }
            Err(e) => tracing::warn!("Not caching {}: {}", key, e),
        }
    }

    /// Whether `key` holds a fresh value. `None` when absent.
    pub fn is_fresh(&self, key: &QueryKey) -> Option<bool> {
        self.entries.get(key).map(|e| e.is_fresh())
    }

    /// Mark exactly `key` stale.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    /// Mark every key starting with `prefix` stale. Returns how many.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.value_mut().invalidated = true;
                count += 1;
            }
        }
        tracing::debug!("Invalidated {} queries under {}", count, prefix);
        count
    }

    /// Drop every key starting with `prefix`.
    pub fn remove_prefix(&self, prefix: &QueryKey) {
        self.entries.retain(|key, _| !key.starts_with(prefix));
    }

    /// Drop everything, e.g. on logout.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop entries unused for longer than their gc time, along with idle
    /// per-key locks.
    pub fn gc(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.last_access.elapsed() < entry.options.gc_time);
        self.in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut entry = self.entries.get_mut(key)?;
        if !entry.is_fresh() {
            return None;
        }
        entry.last_access = Instant::now();
        serde_json::from_value(entry.value.clone()).ok()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache").field("entries", &self.entries.len()).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::error::ClientError;
    use marketplace_types::ApiErrorBody;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(RetryConfig { max_retries: 3, base_delay_ms: 1, max_delay_ms: 5 })
    }

    fn api(status: u16) -> ClientError {
        ClientError::Api { status, body: ApiErrorBody::default() }
    }

    #[test]
    fn test_key_display_and_prefix() {
        let key = query_key!["admin-product", "42"];
        assert_eq!(key.to_string(), r#"["admin-product","42"]"#);
        assert!(key.starts_with(&query_key!["admin-product"]));
        assert!(!key.starts_with(&query_key!["admin-products"]));
        assert!(key.starts_with(&query_key![]));
    }

    #[test]
    fn test_resource_windows_between_two_and_ten_minutes() {
        for resource in [
            Resource::CurrentUser,
            Resource::Products,
            Resource::Marketplace,
            Resource::Licenses,
            Resource::Badges,
            Resource::Referral,
            Resource::Admin,
            Resource::Payouts,
        ] {
            let stale = resource.options().stale_time;
            assert!(stale >= Duration::from_secs(120) && stale <= Duration::from_secs(600));
        }
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_fetch() {
        let cache = QueryCache::new(fast_retry());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ClientError>(vec![1, 2, 3])
        };

        let first: Vec<u32> = cache
            .fetch(query_key!["products", 1], QueryOptions::default(), fetch)
            .await
            .unwrap();
        let second: Vec<u32> = cache
            .fetch(query_key!["products", 1], QueryOptions::default(), fetch)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_forces_refetch() {
        let cache = QueryCache::new(fast_retry());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch =
            move || async move { Ok::<_, ClientError>(calls.fetch_add(1, Ordering::SeqCst)) };

        let _: u32 = cache
            .fetch(query_key!["products", 1], QueryOptions::default(), fetch)
            .await
            .unwrap();
        let _: u32 = cache
            .fetch(query_key!["products", 2], QueryOptions::default(), fetch)
            .await
            .unwrap();
        cache.set(query_key!["licenses"], &7u32, QueryOptions::default());

        assert_eq!(cache.invalidate_prefix(&query_key!["products"]), 2);
        assert_eq!(cache.is_fresh(&query_key!["products", 1]), Some(false));
        assert_eq!(cache.is_fresh(&query_key!["licenses"]), Some(true));

        let refetched: u32 = cache
            .fetch(query_key!["products", 1], QueryOptions::default(), fetch)
            .await
            .unwrap();
        assert_eq!(refetched, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_concurrent_identical_queries_deduplicate() {
        let cache = QueryCache::new(fast_retry());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok::<_, ClientError>("listing".to_string())
        };

        let key = query_key!["marketplace", 1];
        let (a, b) = tokio::join!(
            cache.fetch(key.clone(), QueryOptions::default(), fetch),
            cache.fetch(key.clone(), QueryOptions::default(), fetch),
        );

        assert_eq!(a.unwrap(), "listing");
        assert_eq!(b.unwrap(), "listing");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let cache = QueryCache::new(fast_retry());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(api(404))
        };

        let err = cache
            .fetch(query_key!["product", "x"], QueryOptions::default(), fetch)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_server_errors_retry_three_times() {
        let cache = QueryCache::new(fast_retry());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>(api(500))
        };

        let err = cache
            .fetch(query_key!["badges"], QueryOptions::default(), fetch)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let cache = QueryCache::new(fast_retry());
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let fetch = move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ClientError::Timeout(10))
            } else {
                Ok(5u32)
            }
        };

        let value = cache
            .fetch(query_key!["payouts"], QueryOptions::default(), fetch)
            .await
            .unwrap();
        assert_eq!(value, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_gc_drops_expired_entries() {
        let cache = QueryCache::default();
        let expired = QueryOptions { stale_time: Duration::ZERO, gc_time: Duration::ZERO };
        cache.set(query_key!["kept"], &2u8, QueryOptions::default());
        cache.set(query_key!["old"], &1u8, expired);

        assert_eq!(cache.gc(), 1);
        assert_eq!(cache.get::<u8>(&query_key!["kept"]), Some(2));
        assert_eq!(cache.get::<u8>(&query_key!["old"]), None);
    }

    #[tokio::test]
    async fn test_expired_entries_swept_by_later_fetches() {
        let cache = QueryCache::new(fast_retry());
        let no_retention = QueryOptions { stale_time: Duration::ZERO, gc_time: Duration::ZERO };

        for page in 0..50u32 {
            let _: u32 = cache
                .fetch(query_key!["products", page], no_retention, move || async move {
                    Ok::<_, ClientError>(page)
                })
                .await
                .unwrap();
        }
        assert_eq!(cache.len(), 1);

        let _: String = cache
            .fetch(query_key!["current-user"], QueryOptions::default(), || async {
                Ok::<_, ClientError>("u-1".to_string())
            })
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<u32>(&query_key!["products", 49]), None);
        assert_eq!(cache.get::<String>(&query_key!["current-user"]), Some("u-1".to_string()));
    }
}
