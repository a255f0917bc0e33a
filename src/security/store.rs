//! Rate limit record storage.
//!
//! The limiter only talks to a [`RateLimitStore`], so the process-local map
//! can be swapped for a shared backend without touching admission logic.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Request count for one identifier within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

impl RateLimitRecord {
    /// Empty record whose window closes `window` after `now`.
    pub fn fresh(now: Instant, window: Duration) -> Self {
        Self {
            count: 0,
            window_reset_at: now + window,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.window_reset_at < now
    }
}

/// Backend holding one [`RateLimitRecord`] per identifier.
pub trait RateLimitStore: Send {
    fn get(&self, identifier: &str) -> Option<RateLimitRecord>;

    fn set(&mut self, identifier: &str, record: RateLimitRecord);

    /// Drop every record whose window has closed; returns how many were removed.
    fn evict_expired(&mut self, now: Instant) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store. Resets on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: HashMap<String, RateLimitRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for InMemoryStore {
    fn get(&self, identifier: &str) -> Option<RateLimitRecord> {
        self.records.get(identifier).copied()
    }

    fn set(&mut self, identifier: &str, record: RateLimitRecord) {
        match self.records.get_mut(identifier) {
            Some(existing) => *existing = record,
            None => {
                self.records.insert(identifier.to_string(), record);
            }
        }
    }

    fn evict_expired(&mut self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        before - self.records.len()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let now = Instant::now();
        let mut store = InMemoryStore::new();
        assert!(store.is_empty());

        let mut record = RateLimitRecord::fresh(now, Duration::from_secs(60));
        store.set("10.0.0.1", record);
        record.count = 7;
        store.set("10.0.0.1", record);

        assert_eq!(store.get("10.0.0.1").map(|r| r.count), Some(7));
        assert_eq!(store.len(), 1);
        assert!(store.get("10.0.0.2").is_none());
    }

    #[test]
    fn test_evict_expired_only() {
        let now = Instant::now();
        let mut store = InMemoryStore::new();
        store.set("short", RateLimitRecord::fresh(now, Duration::from_secs(1)));
        store.set("long", RateLimitRecord::fresh(now, Duration::from_secs(600)));

        assert_eq!(store.evict_expired(now), 0);
        // Exactly at the reset instant the window is still open.
        assert_eq!(store.evict_expired(now + Duration::from_secs(1)), 0);
        assert_eq!(store.evict_expired(now + Duration::from_secs(2)), 1);
        assert!(store.get("short").is_none());
        assert!(store.get("long").is_some());
    }
}
