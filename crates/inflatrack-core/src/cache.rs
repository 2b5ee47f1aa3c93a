//! Time-boxed cache entry
//!
//! The caller decides when to trust a cached value by asking
//! [`TimedCache::is_stale`] with the current time; nothing expires on its own.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCache<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> TimedCache<T> {
    pub fn new(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }

    /// Wrap a value fetched just now
    pub fn fresh(value: T) -> Self {
        Self::new(value, Utc::now())
    }

    /// Stale once `ttl` or more has passed since the fetch
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at >= ttl
    }

    /// Time since the fetch, clamped at zero for clock skew
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).max(Duration::zero())
    }

    /// When the entry becomes stale
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.fetched_at + ttl
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
