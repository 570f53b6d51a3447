use std::collections::{HashSet, VecDeque};

use tracing::trace;

use super::CachePolicy;
use crate::utils::{move_key_to_end, push_bounded, remove_key};

/// Two-queue Adaptive Replacement Cache.
///
/// Resident keys live in one of two recency lists:
///
/// * `T1` - keys seen once since admission
/// * `T2` - keys accessed at least once after admission
///
/// A hit in `T1` promotes the key to the tail of `T2`; a hit in `T2` refreshes it
/// to the tail. Eviction always drains `T1` before touching `T2`, and the evicted
/// key is remembered in the matching ghost list (`B1` or `B2`).
///
/// This variant carries no adaptive target size: the ghost lists are history
/// only and never feed into the eviction decision. Each ghost list is bounded
/// to the cache capacity, and a key re-admitted to `T1` leaves its ghost list.
///
/// # Examples
///
/// ```
/// use edgesim_core::policy::{ArcCache, CachePolicy};
///
/// let mut cache = ArcCache::new(2);
/// cache.add("a");
/// cache.add("b");
/// cache.access("a"); // a -> T2
/// cache.add("c"); // evicts b from T1
/// assert!(cache.in_t2("a"));
/// assert!(cache.in_b1("b"));
/// ```
#[derive(Debug, Clone)]
pub struct ArcCache {
    capacity: usize,
    t1: VecDeque<String>,
    t2: VecDeque<String>,
    b1: VecDeque<String>,
    b2: VecDeque<String>,
}

impl ArcCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            t1: VecDeque::with_capacity(capacity),
            t2: VecDeque::with_capacity(capacity),
            b1: VecDeque::new(),
            b2: VecDeque::new(),
        }
    }

    pub fn in_t1(&self, key: &str) -> bool {
        self.t1.iter().any(|k| k == key)
    }

    pub fn in_t2(&self, key: &str) -> bool {
        self.t2.iter().any(|k| k == key)
    }

    pub fn in_b1(&self, key: &str) -> bool {
        self.b1.iter().any(|k| k == key)
    }

    pub fn in_b2(&self, key: &str) -> bool {
        self.b2.iter().any(|k| k == key)
    }

    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }
}

impl CachePolicy for ArcCache {
    fn add(&mut self, key: &str) {
        if self.in_t1(key) || self.in_t2(key) {
            return;
        }
        if self.len() >= self.capacity {
            self.evict();
        }
        remove_key(&mut self.b1, key);
        remove_key(&mut self.b2, key);
        self.t1.push_back(key.to_string());
    }

    fn access(&mut self, key: &str) -> bool {
        if remove_key(&mut self.t1, key) {
            self.t2.push_back(key.to_string());
            return true;
        }
        move_key_to_end(&mut self.t2, key)
    }

    fn evict(&mut self) -> Option<String> {
        if let Some(victim) = self.t1.pop_front() {
            push_bounded(&mut self.b1, victim.clone(), self.capacity);
            trace!(policy = "arc", key = %victim, list = "t1", "evicted");
            return Some(victim);
        }
        let victim = self.t2.pop_front()?;
        push_bounded(&mut self.b2, victim.clone(), self.capacity);
        trace!(policy = "arc", key = %victim, list = "t2", "evicted");
        Some(victim)
    }

    fn remove(&mut self, key: &str) {
        if remove_key(&mut self.t1, key) || remove_key(&mut self.t2, key) {
            return;
        }
        if !remove_key(&mut self.b1, key) {
            remove_key(&mut self.b2, key);
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.in_t1(key) || self.in_t2(key)
    }

    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn resident_keys(&self) -> HashSet<String> {
        self.t1.iter().chain(self.t2.iter()).cloned().collect()
    }

    fn name(&self) -> &'static str {
        "arc"
    }
}
