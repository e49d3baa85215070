use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct StoredEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed in-memory cache with an optional time-to-live.
///
/// Instances are owned by the component that writes them and injected through
/// constructors; there is no process-wide cache. Entries are immutable once
/// written and only disappear on expiry, `remove` or `clear`.
pub struct Cache<V> {
    entries: RwLock<HashMap<String, StoredEntry<V>>>,
    ttl: Option<Duration>,
}

impl<V: Clone + Send + Sync> Cache<V> {
    /// Cache whose entries never expire within the process lifetime.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Cache whose entries expire `ttl` after being stored.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Stores a value, overwriting any previous entry for `key`.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put(&self, key: &str, value: V) {
        let entry = StoredEntry {
            value,
            stored_at: Instant::now(),
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get(&self, key: &str) -> Option<V> {
        let expired = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if self.is_fresh(entry) => {
                    tracing::debug!("Key found and still fresh");
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            tracing::debug!("Key found but expired");
            return self.evict_if_stale(key).await;
        }
        tracing::debug!("Key not found");
        None
    }

    /// Removes `key` only if it is still expired under the write lock; a value
    /// stored by a concurrent `put` since the read is returned instead.
    async fn evict_if_stale(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if self.is_fresh(entry) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, including ones that expired but were not read since.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_fresh(&self, entry: &StoredEntry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.stored_at.elapsed() < ttl,
            None => true,
        }
    }
}

impl<V> Debug for Cache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
