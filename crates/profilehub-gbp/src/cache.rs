//! Short-lived response memo with an injected clock.
//!
//! Entries live for a fixed TTL from insertion. Concurrent writers racing to
//! refill an expired key are tolerated: the last insert wins.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Time source for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Logical class of the memoized response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    Accounts,
    Aggregate,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub class: EndpointClass,
    /// Caller-specific discriminator, e.g. a credential fingerprint plus hints.
    pub scope: String,
}

impl CacheKey {
    #[must_use]
    pub fn new(class: EndpointClass, scope: impl Into<String>) -> Self {
        Self {
            class,
            scope: scope.into(),
        }
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

pub struct ResponseCache<V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: Mutex<HashMap<CacheKey, Entry<V>>>,
}

impl<V: Clone> ResponseCache<V, SystemClock> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<V: Clone, C: Clock> ResponseCache<V, C> {
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a fresh entry for `key`, evicting it if it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let fresh = entries
            .get(key)
            .map(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)?;

        if fresh {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, value: V) {
        let stored_at = self.clock.now();
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Entry { value, stored_at });
    }

    /// Number of stored entries, expired ones included until next read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
