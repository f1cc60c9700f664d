//! Bounded two-queue (2Q) cache for filename-pattern grammar resolutions.

use super::engine::GrammarHandle;
use lru::LruCache;
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Share of capacity reserved for keys seen only once.
const RECENT_RATIO: f64 = 0.25;
/// Ghost list size, as a share of capacity.
const GHOST_RATIO: f64 = 0.50;

/// 2Q cache: new keys enter `recent`; a second touch promotes them to
/// `frequent`. Keys evicted from `recent` are remembered in `ghost` so a quick
/// return skips straight to `frequent`. One-off scans therefore churn only the
/// `recent` queue.
pub struct TwoQueueCache<K: Hash + Eq, V> {
    capacity: usize,
    recent_capacity: usize,
    recent: LruCache<K, V>,
    frequent: LruCache<K, V>,
    ghost: LruCache<K, ()>,
}

impl<K: Hash + Eq, V> TwoQueueCache<K, V> {
    /// Create a cache holding at most `capacity` live entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        let size = capacity.get();
        let recent_capacity = ((size as f64) * RECENT_RATIO) as usize;
        let ghost_capacity = ((size as f64) * GHOST_RATIO) as usize;
        Self {
            capacity: size,
            recent_capacity,
            recent: LruCache::unbounded(),
            frequent: LruCache::unbounded(),
            ghost: LruCache::new(NonZeroUsize::new(ghost_capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Look up `key`, promoting it to the frequent queue on a second touch.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.frequent.contains(key) {
            return self.frequent.get(key);
        }
        let (owned, value) = self.recent.pop_entry(key)?;
        self.frequent.put(owned, value);
        self.frequent.peek(key)
    }

    /// Check for `key` without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.frequent.peek(key).or_else(|| self.recent.peek(key))
    }

    /// Insert or replace `key`.
    pub fn put(&mut self, key: K, value: V) {
        if self.frequent.contains(&key) {
            self.frequent.put(key, value);
            return;
        }
        if self.recent.contains(&key) {
            self.recent.pop(&key);
            self.frequent.put(key, value);
            return;
        }
        if self.ghost.contains(&key) {
            self.make_room(true);
            self.ghost.pop(&key);
            self.frequent.put(key, value);
            return;
        }
        self.make_room(false);
        self.recent.put(key, value);
    }

    fn make_room(&mut self, ghost_hit: bool) {
        if self.len() < self.capacity {
            return;
        }
        let recent_len = self.recent.len();
        let recent_over = recent_len > self.recent_capacity
            || (recent_len == self.recent_capacity && !ghost_hit);
        if recent_len > 0 && recent_over {
            if let Some((key, _)) = self.recent.pop_lru() {
                self.ghost.put(key, ());
            }
            return;
        }
        if self.frequent.pop_lru().is_none() {
            if let Some((key, _)) = self.recent.pop_lru() {
                self.ghost.put(key, ());
            }
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.frequent.contains(key) || self.recent.contains(key)
    }

    /// Number of live entries (ghost keys excluded).
    pub fn len(&self) -> usize {
        self.recent.len() + self.frequent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.frequent.clear();
        self.ghost.clear();
    }
}

/// Counters describing resolution cache traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
}

/// Process-wide filename to grammar memo, safe to share across threads.
pub struct ResolutionCache {
    inner: Mutex<TwoQueueCache<String, GrammarHandle>>,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
}

impl ResolutionCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(TwoQueueCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TwoQueueCache<String, GrammarHandle>> {
        // Entries are plain values; a panic mid-update cannot leave them torn.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, filename: &str) -> Option<GrammarHandle> {
        let found = self.lock().get(filename).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a resolution. Concurrent writers for one filename all compute the
    /// same grammar, so the last write wins.
    pub fn insert(&self, filename: &str, grammar: GrammarHandle) {
        self.lock().put(filename.to_string(), grammar);
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.lock().contains(filename)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
        }
    }
}
