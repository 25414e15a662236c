//! Size-bounded, thread-safe map with least-recently-used eviction.
//!
//! The caches built on top of this type are advisory: a lost entry only costs
//! a recomputation (attribute keys) or a dropped best-effort capture
//! (statement parameters). Lookups share a read lock and stamp the entry they
//! hit; only inserts and removals take the write lock. A poisoned lock is
//! recovered instead of surfaced.
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Default number of entries kept by instrumentation caches.
pub const DEFAULT_CAPACITY: usize = 100;

/// A map holding at most `capacity` entries.
///
/// When full, inserting a new key evicts the least recently used one. Reads
/// through [`BoundedCache::get`] count as uses. A capacity of zero stores
/// nothing.
pub struct BoundedCache<K, V> {
    capacity: usize,
    clock: AtomicU64,
    entries: RwLock<HashMap<K, Slot<V>>>,
}

struct Slot<V> {
    value: V,
    last_used: AtomicU64,
}

impl<V> Slot<V> {
    fn new(value: V, stamp: u64) -> Self {
        Slot {
            value,
            last_used: AtomicU64::new(stamp),
        }
    }
}

fn make_room<K, V>(entries: &mut HashMap<K, Slot<V>>, capacity: usize)
where
    K: Hash + Eq + Clone,
{
    // Only reached on a miss of a full cache.
    while entries.len() >= capacity {
        let oldest = entries
            .iter()
            .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => {
                entries.remove(&key);
            }
            None => break,
        }
    }
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        BoundedCache {
            capacity,
            clock: AtomicU64::new(0),
            entries: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of live entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a clone of the value stored for `key`, marking it as used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        V: Clone,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entries = self.read();
        let slot = entries.get(key)?;
        slot.last_used.store(self.tick(), Ordering::Relaxed);
        Some(slot.value.clone())
    }

    /// Returns the value for `key`, computing and storing it on a miss.
    ///
    /// `make` runs without the lock held, so two threads missing on the same
    /// key may both compute it; the later insert wins.
    pub fn get_or_insert_with<Q, F>(&self, key: &Q, make: F) -> V
    where
        V: Clone,
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = make();
        self.insert(key.to_owned(), value.clone());
        value
    }

    /// Stores `value` for `key`, returning the value it replaced.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }
        let stamp = self.tick();
        let mut entries = self.write();
        if let Some(slot) = entries.get_mut(&key) {
            *slot.last_used.get_mut() = stamp;
            return Some(std::mem::replace(&mut slot.value, value));
        }
        make_room(&mut entries, self.capacity);
        entries.insert(key, Slot::new(value, stamp));
        None
    }

    /// Runs `update` on the entry for `key`, creating a default entry first if
    /// there is none.
    pub fn update<R, F>(&self, key: K, update: F) -> R
    where
        V: Default,
        F: FnOnce(&mut V) -> R,
    {
        if self.capacity == 0 {
            return update(&mut V::default());
        }
        let stamp = self.tick();
        let mut entries = self.write();
        if !entries.contains_key(&key) {
            make_room(&mut entries, self.capacity);
        }
        let slot = entries
            .entry(key)
            .or_insert_with(|| Slot::new(V::default(), stamp));
        *slot.last_used.get_mut() = stamp;
        update(&mut slot.value)
    }

    /// Removes and returns the entry for `key`.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.write().remove(key).map(|slot| slot.value)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Slot<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Slot<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        BoundedCache::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len());
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("len", &len)
            .finish()
    }
}
