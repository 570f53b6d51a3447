use std::collections::HashSet;
use std::fmt;

use crate::policy::CachePolicy;
use crate::{ConfigError, EvictionPolicy};

/// A node's cache: one eviction policy instance plus the capacity invariant.
///
/// All mutations go through the wrapped policy, so warm-starting a store with
/// [`warm`](Self::warm) leaves the policy bookkeeping exactly as if the keys had
/// been admitted during a run.
///
/// After every `add` and `evict` the store checks that the resident count does
/// not exceed the capacity and panics otherwise: a policy that over-admits would
/// silently inflate hit rates.
///
/// `CacheStore` is not synchronized on its own; [`Node`](crate::Node) keeps it
/// behind a `parking_lot::Mutex`.
///
/// # Examples
///
/// ```
/// use edgesim_core::{CacheStore, EvictionPolicy};
///
/// let mut store = CacheStore::new(EvictionPolicy::LRU, 2).unwrap();
/// store.warm(["a", "b", "c"]);
/// assert_eq!(store.len(), 2);
/// assert!(!store.access("a"));
/// assert!(store.access("c"));
/// ```
pub struct CacheStore {
    kind: EvictionPolicy,
    policy: Box<dyn CachePolicy>,
}

impl CacheStore {
    pub fn new(kind: EvictionPolicy, capacity: usize) -> Result<Self, ConfigError> {
        Self::with_seed(kind, capacity, None)
    }

    pub fn with_seed(
        kind: EvictionPolicy,
        capacity: usize,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            kind,
            policy: kind.build_with_seed(capacity, seed)?,
        })
    }

    /// The origin's store: an unbounded catalog seeded with `keys`.
    pub fn catalog<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self {
            kind: EvictionPolicy::Catalog,
            policy: Box::new(crate::policy::CatalogCache::new()),
        };
        store.warm(keys);
        store
    }

    pub fn kind(&self) -> EvictionPolicy {
        self.kind
    }

    /// Admits `key`; evicts first if the store is full.
    pub fn add(&mut self, key: &str) {
        self.policy.add(key);
        self.check_capacity();
    }

    /// Replays `add` for each key, in order.
    pub fn warm<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.add(key.as_ref());
        }
    }

    /// Hit/miss lookup; a hit refreshes the policy metadata.
    pub fn access(&mut self, key: &str) -> bool {
        self.policy.access(key)
    }

    pub fn evict(&mut self) -> Option<String> {
        let evicted = self.policy.evict();
        self.check_capacity();
        evicted
    }

    pub fn remove(&mut self, key: &str) {
        self.policy.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.policy.contains(key)
    }

    pub fn len(&self) -> usize {
        self.policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.policy.capacity()
    }

    pub fn resident_keys(&self) -> HashSet<String> {
        self.policy.resident_keys()
    }

    fn check_capacity(&self) {
        if let Some(capacity) = self.policy.capacity() {
            assert!(
                self.policy.len() <= capacity,
                "{} store holds {} keys over capacity {}",
                self.policy.name(),
                self.policy.len(),
                capacity
            );
        }
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("kind", &self.kind)
            .field("len", &self.policy.len())
            .field("capacity", &self.policy.capacity())
            .finish()
    }
}
