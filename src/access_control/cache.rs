//! Access decision cache
//!
//! Evaluating pattern rules for every request is wasteful when the same
//! clients keep reconnecting, so decisions are cached per client address.
//! The cache is bounded both by entry count (least recently used entries are
//! evicted first) and by age: entries older than the TTL are dropped the next
//! time they are looked up. There is no background sweep.
//!
//! Entries are keyed by address only. Once a decision is cached, lookups for
//! the same address return it whatever hostname the client now resolves to,
//! until the entry expires.

use crate::access_control::types::AccessPrivilege;
use lru::LruCache;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::trace;

/// Monotonic time source used to age cache entries
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Clock backed by [`Instant::now`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Useful for exercising expiry without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self
            .elapsed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *elapsed += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = self
            .elapsed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.start + *elapsed
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    privilege: AccessPrivilege,
    created_at: Instant,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub entries: usize,
    pub capacity: usize,
}

/// Bounded, expiring cache of access decisions keyed by client address
pub struct DecisionCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl DecisionCache {
    /// Create a cache holding at most `capacity` decisions for `ttl` each
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    // Recover from a poisoned lock, entries are always left consistent
    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("decision cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up a cached decision
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, address: &str) -> Option<AccessPrivilege> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let Some(entry) = entries.get(address).copied() else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        if now.saturating_duration_since(entry.created_at) >= self.ttl {
            entries.pop(address);
            drop(entries);
            trace!(address, "Cached decision expired");
            self.expirations.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.privilege)
    }

    /// Store a decision, replacing any previous one for the address
    pub fn put(&self, address: &str, privilege: AccessPrivilege) {
        let entry = CacheEntry {
            privilege,
            created_at: self.clock.now(),
        };

        let evicted = self.lock().push(address.to_string(), entry);
        if let Some((evicted_address, _)) = evicted
            && evicted_address != address
        {
            trace!(address = %evicted_address, "Evicted least recently used decision");
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every cached decision
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, capacity) = {
            let guard = self.lock();
            (guard.len(), guard.cap().get())
        };
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries,
            capacity,
        }
    }
}

impl fmt::Debug for DecisionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionCache")
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}
