//! Keyed TTL cache with in-flight deduplication.
//!
//! One cache object per dataset, owned by the long-lived portal state. The
//! slot lock is held across the fetch, so concurrent callers share a single
//! pending request instead of stampeding the backend.

use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug)]
struct CachedValue<V> {
    stored_at: Instant,
    value: Arc<V>,
}

/// TTL cache keyed by `K` (locale, in practice).
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CachedValue<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, fetching it when missing or
    /// expired. Fetch failures are propagated and nothing is cached.
    ///
    /// # Errors
    /// Returns the fetch error when the value had to be (re)fetched and the
    /// fetch failed.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some(cached) = entries.get(&key) {
            if cached.stored_at.elapsed() < self.ttl {
                return Ok(cached.value.clone());
            }
        }

        let value = Arc::new(fetch().await?);
        entries.insert(
            key,
            CachedValue {
                stored_at: Instant::now(),
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Drops every cached value.
    pub async fn invalidate_all(&self) {
        self.entries.lock().await.clear();
    }
}
