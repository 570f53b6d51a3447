use std::collections::{HashSet, VecDeque};

use tracing::trace;

use super::CachePolicy;
use crate::utils::{move_key_to_end, remove_key};

/// Single-queue policy backing both FIFO and LRU.
///
/// Keys are kept in insertion order; the head of the queue is always the next
/// eviction victim. The two policies differ only in what `access` does:
///
/// * **FIFO** - a hit leaves the queue untouched, so eviction order equals
///   insertion order regardless of how often a key is read.
/// * **LRU** - a hit moves the key to the tail (most recently used).
///
/// # Examples
///
/// ```
/// use edgesim_core::policy::{CachePolicy, OrderedCache};
///
/// let mut lru = OrderedCache::lru(2);
/// lru.add("a");
/// lru.add("b");
/// assert!(lru.access("a"));
/// lru.add("c"); // evicts "b"
/// assert!(!lru.contains("b"));
///
/// let mut fifo = OrderedCache::fifo(2);
/// fifo.add("a");
/// fifo.add("b");
/// assert!(fifo.access("a"));
/// fifo.add("c"); // still evicts "a"
/// assert!(!fifo.contains("a"));
/// ```
#[derive(Debug, Clone)]
pub struct OrderedCache {
    capacity: usize,
    order: VecDeque<String>,
    members: HashSet<String>,
    reorder_on_access: bool,
}

impl OrderedCache {
    /// First In, First Out: accesses do not reorder.
    pub fn fifo(capacity: usize) -> Self {
        Self::with_reorder(capacity, false)
    }

    /// Least Recently Used: accesses move the key to the tail.
    pub fn lru(capacity: usize) -> Self {
        Self::with_reorder(capacity, true)
    }

    fn with_reorder(capacity: usize, reorder_on_access: bool) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            reorder_on_access,
        }
    }

    /// Keys from next-to-evict to most recent.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn check_consistency(&self) {
        assert_eq!(
            self.order.len(),
            self.members.len(),
            "{} order queue and member set diverged",
            self.name()
        );
    }
}

impl CachePolicy for OrderedCache {
    fn add(&mut self, key: &str) {
        if self.members.contains(key) {
            return;
        }
        if self.order.len() >= self.capacity {
            self.evict();
        }
        self.order.push_back(key.to_string());
        self.members.insert(key.to_string());
        self.check_consistency();
    }

    fn access(&mut self, key: &str) -> bool {
        if !self.members.contains(key) {
            return false;
        }
        if self.reorder_on_access {
            let moved = move_key_to_end(&mut self.order, key);
            assert!(moved, "LRU key `{key}` resident but missing from order queue");
        }
        true
    }

    fn evict(&mut self) -> Option<String> {
        let victim = self.order.pop_front()?;
        let was_member = self.members.remove(&victim);
        assert!(was_member, "{} evicted `{victim}` which was not resident", self.name());
        trace!(policy = self.name(), key = %victim, "evicted");
        Some(victim)
    }

    fn remove(&mut self, key: &str) {
        if self.members.remove(key) {
            remove_key(&mut self.order, key);
            self.check_consistency();
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    fn len(&self) -> usize {
        self.members.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn resident_keys(&self) -> HashSet<String> {
        self.members.clone()
    }

    fn name(&self) -> &'static str {
        if self.reorder_on_access {
            "lru"
        } else {
            "fifo"
        }
    }
}
