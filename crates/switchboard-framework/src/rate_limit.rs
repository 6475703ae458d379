//! Per-user usage counters with a fixed expiry window.
//!
//! A [`RateLimitStore`] belongs to one command (nothing prevents sharing one
//! between commands, but then their uses are counted together). Each user gets
//! a counter that lives for one window from its first use; when the window
//! elapses the counter disappears and the next use starts a fresh one.
//! Expired counters are swept from [`check`](RateLimitStore::check) at most
//! once per window, so users who never come back do not accumulate.
//!
//! The store is a [`DashMap`], so handler tasks running concurrently on
//! different threads can consult it without the router taking any lock.

use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Window length used by [`RateLimitStore::per_minute`].
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Usage {
    count: u32,
    expires_at: Instant,
}

impl Usage {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Usage counters keyed by user ID.
#[derive(Debug)]
pub struct RateLimitStore {
    entries: DashMap<String, Usage>,
    window: Duration,
    next_sweep: Mutex<Instant>,
}

impl Default for RateLimitStore {
    fn default() -> Self {
        Self::per_minute()
    }
}

impl RateLimitStore {
    /// Creates a store whose counters live for `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
            next_sweep: Mutex::new(Instant::now() + window),
        }
    }

    /// Creates a store with a one minute window.
    pub fn per_minute() -> Self {
        Self::new(DEFAULT_WINDOW)
    }

    /// Returns the window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records one use by `key` and reports whether it is within `max` uses.
    ///
    /// The first use in a window seeds the counter to 1 and is always
    /// allowed. Later uses bump the counter and are allowed while the
    /// counter stays below `max + 1`, so exactly `max` uses pass per window.
    /// Bumping never extends the window.
    pub fn check(&self, key: &str, max: u32) -> bool {
        let now = Instant::now();
        self.sweep(now);

        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut entry) if entry.get().is_live(now) => {
                let usage = entry.get_mut();
                usage.count = usage.count.saturating_add(1);
                trace!(key, count = usage.count, max, "Rate limit counter bumped");
                usage.count < max.saturating_add(1)
            }
            Entry::Occupied(mut entry) => {
                entry.insert(self.seed(now));
                trace!(key, "Rate limit window expired, counter reseeded");
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(self.seed(now));
                trace!(key, "Rate limit counter seeded");
                true
            }
        }
    }

    /// Returns the live usage count for `key`, if any.
    pub fn uses(&self, key: &str) -> Option<u32> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|usage| usage.is_live(now))
            .map(|usage| usage.count)
    }

    /// Forgets the counter for `key`.
    pub fn reset(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drops every expired counter, returning how many were removed.
    ///
    /// Expired counters are already ignored by [`check`](Self::check); this
    /// only reclaims their memory.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, usage| usage.is_live(now));
        before - self.entries.len()
    }

    /// Returns the number of stored counters, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no counters are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Purges expired counters once the sweep deadline has passed.
    fn sweep(&self, now: Instant) {
        {
            let mut next = self.next_sweep.lock();
            if now < *next {
                return;
            }
            *next = now + self.window;
        }
        let removed = self.purge_expired();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "Expired rate limit counters swept");
        }
    }

    fn seed(&self, now: Instant) -> Usage {
        Usage {
            count: 1,
            expires_at: now + self.window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_exactly_max_uses_per_window() {
        let store = RateLimitStore::per_minute();

        for i in 1..=5 {
            assert!(store.check("u1", 5), "use {i} should pass");
        }
        assert!(!store.check("u1", 5), "6th use should be denied");
        assert!(!store.check("u1", 5));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(store.check("u1", 5));
        assert_eq!(store.uses("u1"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_is_fixed_from_first_use() {
        let store = RateLimitStore::new(Duration::from_secs(10));

        assert!(store.check("u1", 2));
        tokio::time::advance(Duration::from_secs(8)).await;
        assert!(store.check("u1", 2));
        assert!(!store.check("u1", 2));

        // Bumping the counter at t=8 did not push the expiry past t=10.
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(store.uses("u1"), None);
        assert!(store.check("u1", 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_users_are_counted_independently() {
        let store = RateLimitStore::per_minute();

        assert!(store.check("u1", 1));
        assert!(!store.check("u1", 1));
        assert!(store.check("u2", 1));
        assert_eq!(store.uses("u1"), Some(2));
        assert_eq!(store.uses("u2"), Some(1));

        store.reset("u1");
        assert!(store.check("u1", 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let store = RateLimitStore::new(Duration::from_secs(5));
        store.check("u1", 3);
        tokio::time::advance(Duration::from_secs(3)).await;
        store.check("u2", 3);
        tokio::time::advance(Duration::from_secs(3)).await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.uses("u2"), Some(1));
        assert!(!store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_sweeps_departed_users() {
        let store = RateLimitStore::per_minute();
        for i in 0..1000 {
            assert!(store.check(&format!("user-{i}"), 5));
        }
        assert_eq!(store.len(), 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(store.check("late", 5));
        assert_eq!(store.len(), 1);
        assert_eq!(store.uses("late"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_live_counters() {
        let store = RateLimitStore::new(Duration::from_secs(10));
        store.check("u1", 3);
        tokio::time::advance(Duration::from_secs(6)).await;
        store.check("u2", 3);
        tokio::time::advance(Duration::from_secs(5)).await;

        // The sweep at t=11 drops u1 but keeps u2, which lives until t=16.
        store.check("u3", 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.uses("u2"), Some(1));
        assert_eq!(store.uses("u1"), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_never_overshoot() {
        let store = Arc::new(RateLimitStore::per_minute());
        let mut tasks = Vec::new();

        for _ in 0..32 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move { store.check("u1", 10) }));
        }

        let mut allowed = 0;
        for task in tasks {
            if task.await.unwrap() {
                allowed += 1;
            }
        }

        assert_eq!(allowed, 10);
        assert_eq!(store.uses("u1"), Some(32));
    }
}
