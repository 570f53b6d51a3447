use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::trace;

use super::CachePolicy;

/// Random replacement: the eviction victim is drawn uniformly from the
/// resident set. Accesses never change anything.
///
/// Keys are stored in a dense vector with a key-to-slot index so both the
/// random pick and the removal are O(1) (swap-remove).
///
/// # Examples
///
/// ```
/// use edgesim_core::policy::{CachePolicy, RandomCache};
///
/// let mut cache = RandomCache::with_seed(2, 7);
/// cache.add("a");
/// cache.add("b");
/// cache.add("c");
/// assert_eq!(cache.len(), 2);
/// assert!(cache.contains("c"));
/// ```
pub struct RandomCache {
    capacity: usize,
    keys: Vec<String>,
    slots: HashMap<String, usize>,
    rng: fastrand::Rng,
}

impl RandomCache {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, fastrand::Rng::new())
    }

    /// Deterministic variant for reproducible runs.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(capacity: usize, rng: fastrand::Rng) -> Self {
        Self {
            capacity,
            keys: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            rng,
        }
    }

    fn take_slot(&mut self, slot: usize) -> String {
        let key = self.keys.swap_remove(slot);
        self.slots.remove(&key);
        if let Some(moved) = self.keys.get(slot) {
            self.slots.insert(moved.clone(), slot);
        }
        assert_eq!(
            self.keys.len(),
            self.slots.len(),
            "random policy key vector and slot index diverged"
        );
        key
    }
}

impl fmt::Debug for RandomCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomCache")
            .field("capacity", &self.capacity)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl CachePolicy for RandomCache {
    fn add(&mut self, key: &str) {
        if self.slots.contains_key(key) {
            return;
        }
        if self.keys.len() >= self.capacity {
            self.evict();
        }
        self.slots.insert(key.to_string(), self.keys.len());
        self.keys.push(key.to_string());
    }

    fn access(&mut self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn evict(&mut self) -> Option<String> {
        if self.keys.is_empty() {
            return None;
        }
        let slot = self.rng.usize(..self.keys.len());
        let victim = self.take_slot(slot);
        trace!(policy = "random", key = %victim, "evicted");
        Some(victim)
    }

    fn remove(&mut self, key: &str) {
        if let Some(&slot) = self.slots.get(key) {
            self.take_slot(slot);
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn resident_keys(&self) -> HashSet<String> {
        self.keys.iter().cloned().collect()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_policy_respects_limit() {
        let mut cache = RandomCache::with_seed(3, 42);
        for i in 1..=10 {
            cache.add(&i.to_string());
            assert!(cache.len() <= 3);
        }
        assert!(cache.contains("10"));
    }

    #[test]
    fn test_debug_lists_resident_keys() {
        let mut cache = RandomCache::with_seed(2, 3);
        cache.add("only");
        let rendered = format!("{:?}", cache);
        assert!(rendered.starts_with("RandomCache"));
        assert!(rendered.contains("\"only\""));
        assert!(rendered.contains("capacity: 2"));
    }

    #[test]
    fn test_access_does_not_mutate() {
        let mut cache = RandomCache::with_seed(3, 1);
        cache.add("a");
        cache.add("b");
        let before = cache.keys.clone();
        for _ in 0..10 {
            assert!(cache.access("a"));
        }
        assert!(!cache.access("z"));
        assert_eq!(cache.keys, before);
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut cache = RandomCache::with_seed(4, 9);
        for k in ["a", "b", "c", "d"] {
            cache.add(k);
        }
        cache.remove("a");
        cache.remove("missing");
        assert_eq!(cache.len(), 3);
        for k in ["b", "c", "d"] {
            let slot = cache.slots[k];
            assert_eq!(cache.keys[slot], k);
        }
    }

    #[test]
    fn test_same_seed_same_victims() {
        let run = |seed| {
            let mut cache = RandomCache::with_seed(5, seed);
            for i in 0..5 {
                cache.add(&i.to_string());
            }
            (0..5).filter_map(|_| cache.evict()).collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }
}
