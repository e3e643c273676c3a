//! Short-lived balance caching.
//!
//! Wallet pages poll balances often; caching them for a few seconds keeps
//! the RPC provider's rate limits out of reach. Entries expire after the
//! configured TTL. They are dropped on read, swept on insert once the
//! cache grows past a threshold, and swept periodically by the server.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;
use crate::solana::pubkey::Pubkey;

/// Entry count past which an insert first sweeps expired entries.
pub const DEFAULT_PURGE_THRESHOLD: usize = 4096;

/// Which balance an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceKind {
    /// Native SOL, in lamports.
    Sol,
    /// Charity token, in base units.
    Token,
}

#[derive(Debug, Clone, Copy)]
struct CachedBalance {
    amount: u64,
    fetched_at: Instant,
}

/// A thread-safe TTL cache for account balances.
#[derive(Debug, Clone)]
pub struct BalanceCache {
    inner: Arc<DashMap<(Pubkey, BalanceKind), CachedBalance>>,
    ttl: Duration,
    purge_threshold: usize,
}

impl BalanceCache {
    /// Create a new empty cache. A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            purge_threshold: DEFAULT_PURGE_THRESHOLD,
        }
    }

    pub fn with_purge_threshold(mut self, threshold: usize) -> Self {
        self.purge_threshold = threshold;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached balance if present and fresh.
    pub fn get(&self, address: &Pubkey, kind: BalanceKind) -> Option<u64> {
        let key = (*address, kind);
        let hit = self.inner.get(&key).map(|entry| *entry.value());
        match hit {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                metrics::record_cache_lookup(true);
                Some(entry.amount)
            }
            Some(_) => {
                self.inner.remove(&key);
                metrics::record_cache_lookup(false);
                None
            }
            None => {
                metrics::record_cache_lookup(false);
                None
            }
        }
    }

    /// Store a freshly fetched balance.
    pub fn insert(&self, address: Pubkey, kind: BalanceKind, amount: u64) {
        if self.ttl.is_zero() {
            return;
        }
        if self.inner.len() >= self.purge_threshold {
            let purged = self.purge_expired();
            tracing::debug!(purged, remaining = self.inner.len(), "Swept balance cache");
        }
        self.inner.insert(
            (address, kind),
            CachedBalance {
                amount,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Forget every balance of an address, e.g. after a transfer touching it.
    pub fn invalidate(&self, address: &Pubkey) {
        self.inner.remove(&(*address, BalanceKind::Sol));
        self.inner.remove(&(*address, BalanceKind::Token));
    }

    /// Drop all expired entries.
    pub fn purge_expired(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
        before - self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_operations() {
        let cache = BalanceCache::new(Duration::from_secs(60));
        let address = Pubkey::new([1; 32]);

        assert!(cache.get(&address, BalanceKind::Sol).is_none());

        cache.insert(address, BalanceKind::Sol, 42);
        cache.insert(address, BalanceKind::Token, 7);
        assert_eq!(cache.get(&address, BalanceKind::Sol), Some(42));
        assert_eq!(cache.get(&address, BalanceKind::Token), Some(7));
        assert_eq!(cache.len(), 2);

        cache.invalidate(&address);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = BalanceCache::new(Duration::from_millis(1));
        let address = Pubkey::new([2; 32]);
        cache.insert(address, BalanceKind::Sol, 1);
        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get(&address, BalanceKind::Sol).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let cache = BalanceCache::new(Duration::from_millis(1));
        cache.insert(Pubkey::new([3; 32]), BalanceKind::Sol, 1);
        cache.insert(Pubkey::new([4; 32]), BalanceKind::Token, 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.purge_expired(), 2);
    }

    #[test]
    fn test_insert_sweeps_past_threshold() {
        let cache = BalanceCache::new(Duration::from_millis(1)).with_purge_threshold(2);
        cache.insert(Pubkey::new([6; 32]), BalanceKind::Sol, 1);
        cache.insert(Pubkey::new([7; 32]), BalanceKind::Sol, 1);
        std::thread::sleep(Duration::from_millis(5));

        // Nobody reads the stale entries back; the next insert drops them.
        cache.insert(Pubkey::new([8; 32]), BalanceKind::Sol, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = BalanceCache::new(Duration::ZERO);
        cache.insert(Pubkey::new([5; 32]), BalanceKind::Sol, 1);
        assert!(cache.is_empty());
    }
}
