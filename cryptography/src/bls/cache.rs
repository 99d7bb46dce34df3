//! Expiring cache of weighted public keys.
//!
//! Computing a signer's weighted public key costs a hash over the whole committee and a G2
//! scalar multiplication. [AggregationCache] memoizes the result under
//! `SHA-256(pk_i || pk_0 || ... || pk_{n-1})`. A hit is always interchangeable with a fresh
//! computation: verification results never depend on whether a cache is supplied.
//!
//! Entries expire lazily: a read that finds an expired entry removes it and reports a miss. When
//! the cache is full, an insert first drops every expired entry and then, if still full, the
//! entry closest to expiry.
//!
//! After [AggregationCache::close], every operation fails with [Error::CacheClosed].

use super::{group::G2, Error};
use crate::field::DIGEST_LENGTH;
use std::{
    collections::HashMap,
    num::NonZeroUsize,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::{Duration, Instant},
};
use tracing::{debug, trace};

/// Key of a cached weighted public key.
pub type CacheKey = [u8; DIGEST_LENGTH];

/// Configuration for an [AggregationCache].
#[derive(Clone, Debug)]
pub struct Config {
    /// How long an entry remains valid after insertion.
    pub ttl: Duration,

    /// Maximum number of entries held at once.
    pub capacity: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            capacity: NonZeroUsize::new(10_000).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

struct Entry {
    point: G2,
    expires_at: Instant,
}

type Entries = Option<HashMap<CacheKey, Entry>>;

/// A concurrent, TTL and capacity bounded map from cache keys to weighted public keys.
///
/// Readers proceed in parallel. Inserts, removals and close take exclusive access.
pub struct AggregationCache {
    cfg: Config,
    entries: RwLock<Entries>,
}

impl AggregationCache {
    /// Creates an empty cache.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            entries: RwLock::new(Some(HashMap::new())),
        }
    }

    // A poisoned lock is treated the same as a closed cache.
    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>, Error> {
        self.entries.read().map_err(|_| Error::CacheClosed)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>, Error> {
        self.entries.write().map_err(|_| Error::CacheClosed)
    }

    /// Returns the cached point for `key` if present and unexpired.
    pub fn get(&self, key: &CacheKey) -> Result<Option<G2>, Error> {
        let now = Instant::now();
        {
            let guard = self.read()?;
            let entries = guard.as_ref().ok_or(Error::CacheClosed)?;
            match entries.get(key) {
                None => {
                    trace!("cache miss");
                    return Ok(None);
                }
                Some(entry) if entry.expires_at > now => {
                    trace!("cache hit");
                    return Ok(Some(entry.point));
                }
                Some(_) => {}
            }
        }

        // Upgrade to remove the expired entry (it may have been refreshed in between)
        let mut guard = self.write()?;
        let entries = guard.as_mut().ok_or(Error::CacheClosed)?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.point)),
            Some(_) => {
                entries.remove(key);
                debug!(remaining = entries.len(), "cache entry expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Stores `point` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, point: G2) -> Result<(), Error> {
        let now = Instant::now();
        let mut guard = self.write()?;
        let entries = guard.as_mut().ok_or(Error::CacheClosed)?;

        if !entries.contains_key(&key) && entries.len() >= self.cfg.capacity.get() {
            let before = entries.len();
            entries.retain(|_, entry| entry.expires_at > now);
            let expired = before - entries.len();
            if entries.len() >= self.cfg.capacity.get() {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(key, _)| *key);
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
            debug!(
                expired,
                capacity = self.cfg.capacity.get(),
                "evicted cache entries"
            );
        }

        entries.insert(
            key,
            Entry {
                point,
                expires_at: now + self.cfg.ttl,
            },
        );
        Ok(())
    }

    /// Removes the entry for `key`, returning whether one was present.
    pub fn remove(&self, key: &CacheKey) -> Result<bool, Error> {
        let mut guard = self.write()?;
        let entries = guard.as_mut().ok_or(Error::CacheClosed)?;
        Ok(entries.remove(key).is_some())
    }

    /// Returns the number of stored entries (including expired entries not yet removed).
    pub fn len(&self) -> Result<usize, Error> {
        let guard = self.read()?;
        guard.as_ref().map(HashMap::len).ok_or(Error::CacheClosed)
    }

    /// Returns whether the cache holds no entries.
    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    /// Drops every entry and rejects all later operations.
    pub fn close(&self) {
        // Closing a poisoned cache is a no-op (it already reports closed)
        if let Ok(mut guard) = self.entries.write() {
            if let Some(entries) = guard.take() {
                debug!(dropped = entries.len(), "closed aggregation cache");
            }
        }
    }

    /// Returns whether [AggregationCache::close] has been called.
    pub fn is_closed(&self) -> bool {
        self.read().map(|guard| guard.is_none()).unwrap_or(true)
    }
}

impl Default for AggregationCache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::group::Scalar;
    use rand::thread_rng;
    use std::{sync::Arc, thread};

    fn point() -> G2 {
        let mut p = G2::one();
        p.mul(&Scalar::random(&mut thread_rng()));
        p
    }

    fn key(i: u8) -> CacheKey {
        [i; DIGEST_LENGTH]
    }

    fn small(ttl: Duration, capacity: usize) -> AggregationCache {
        AggregationCache::new(Config {
            ttl,
            capacity: NonZeroUsize::new(capacity).unwrap(),
        })
    }

    #[test]
    fn test_insert_get_remove() {
        let cache = AggregationCache::default();
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.get(&key(1)).unwrap(), None);

        let p = point();
        cache.insert(key(1), p).unwrap();
        assert_eq!(cache.get(&key(1)).unwrap(), Some(p));
        assert_eq!(cache.len().unwrap(), 1);

        // Replace
        let q = point();
        cache.insert(key(1), q).unwrap();
        assert_eq!(cache.get(&key(1)).unwrap(), Some(q));
        assert_eq!(cache.len().unwrap(), 1);

        assert!(cache.remove(&key(1)).unwrap());
        assert!(!cache.remove(&key(1)).unwrap());
        assert_eq!(cache.get(&key(1)).unwrap(), None);
    }

    #[test]
    fn test_expired_entry_removed_on_read() {
        let cache = small(Duration::from_millis(10), 8);
        cache.insert(key(1), point()).unwrap();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.len().unwrap(), 1);
        assert_eq!(cache.get(&key(1)).unwrap(), None);
        assert_eq!(cache.len().unwrap(), 0);
    }

    #[test]
    fn test_capacity_evicts_earliest_expiry() {
        let cache = small(Duration::from_secs(60), 2);
        cache.insert(key(1), point()).unwrap();
        thread::sleep(Duration::from_millis(2));
        cache.insert(key(2), point()).unwrap();
        thread::sleep(Duration::from_millis(2));
        cache.insert(key(3), point()).unwrap();

        assert_eq!(cache.len().unwrap(), 2);
        assert_eq!(cache.get(&key(1)).unwrap(), None);
        assert!(cache.get(&key(2)).unwrap().is_some());
        assert!(cache.get(&key(3)).unwrap().is_some());
    }

    #[test]
    fn test_capacity_prefers_expired() {
        let cache = small(Duration::from_millis(10), 2);
        cache.insert(key(1), point()).unwrap();
        cache.insert(key(2), point()).unwrap();
        thread::sleep(Duration::from_millis(30));
        cache.insert(key(3), point()).unwrap();
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_close() {
        let cache = AggregationCache::default();
        cache.insert(key(1), point()).unwrap();
        assert!(!cache.is_closed());

        cache.close();
        assert!(cache.is_closed());
        assert!(matches!(cache.get(&key(1)), Err(Error::CacheClosed)));
        assert!(matches!(
            cache.insert(key(2), point()),
            Err(Error::CacheClosed)
        ));
        assert!(matches!(cache.remove(&key(1)), Err(Error::CacheClosed)));
        assert!(matches!(cache.len(), Err(Error::CacheClosed)));

        // Closing twice is harmless
        cache.close();
        assert!(cache.is_closed());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(AggregationCache::default());
        let p = point();
        cache.insert(key(0), p).unwrap();

        let handles: Vec<_> = (1..=8u8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(cache.get(&key(0)).unwrap(), Some(p));
                    }
                    cache.insert(key(i), p).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len().unwrap(), 9);
    }
}
