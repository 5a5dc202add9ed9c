// In-memory TTL cache for expensive aggregate fetches.
// Entries are evicted lazily on read; diagnostics never evict.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::clock::{Clock, SystemClock};

/// Default TTL for the project-board aggregate: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key the entry was stored under.
    pub key: String,
    /// The cached data.
    pub value: V,
    /// When the data was stored.
    pub stored_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(key: impl Into<String>, value: V, stored_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at,
        }
    }

    /// Instant at which the entry stops being valid.
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.stored_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Valid only while `now - stored_at < ttl`.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now >= self.expires_at(ttl)
    }
}

/// Read-only view of an entry's freshness, for "time until refresh" displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Milliseconds left before expiry, clamped at zero.
    pub remaining_ms: u64,
    pub is_expired: bool,
}

/// Process-wide TTL key/value store with a single fixed TTL.
pub struct CacheCoordinator<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheCoordinator<V> {
    /// Create a cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value`, replacing any existing entry wholesale.
    pub fn set(&self, key: &str, value: V) {
        let entry = CacheEntry::new(key, value, self.clock.now());
        self.lock().insert(key.to_string(), entry);
        debug!(key, "cache set");
    }

    /// Return the value if still fresh. An expired entry is removed and reported absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired = match entries.get(key) {
            None => {
                debug!(key, "cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(self.ttl, now),
        };

        if expired {
            entries.remove(key);
            debug!(key, "cache entry expired, evicted");
            return None;
        }

        debug!(key, "cache hit");
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Freshness view of an entry. Does not evict, so an expired entry still reports.
    pub fn cache_info(&self, key: &str) -> Option<CacheInfo> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;

        let expires_at = entry.expires_at(self.ttl);
        let remaining_ms = expires_at
            .signed_duration_since(now)
            .num_milliseconds()
            .max(0) as u64;

        Some(CacheInfo {
            stored_at: entry.stored_at,
            expires_at,
            remaining_ms,
            is_expired: entry.is_expired(self.ttl, now),
        })
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock().clear();
        debug!("cache cleared");
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
