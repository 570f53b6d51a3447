use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::trace;

use super::CachePolicy;
use crate::utils::remove_key;

/// Least Frequently Used policy with frequency buckets.
///
/// Each resident key carries an access count. Keys sharing a count live in a
/// bucket ordered by when they reached that count, and `min_freq` points at the
/// lowest populated bucket. Eviction pops the oldest key of that bucket, so
/// among equally cold keys the one that has been cold longest leaves first.
///
/// * `add` inserts at frequency 1 and resets `min_freq` to 1.
/// * `access` moves the key to the tail of the next bucket. If that empties the
///   `min_freq` bucket, `min_freq` advances by one.
/// * `remove` may leave `min_freq` pointing at an empty bucket; eviction then
///   falls back to the lowest non-empty bucket.
///
/// # Examples
///
/// ```
/// use edgesim_core::policy::{CachePolicy, LfuCache};
///
/// let mut cache = LfuCache::new(2);
/// cache.add("a");
/// cache.add("b");
/// cache.access("a");
/// cache.add("c"); // "b" has the lowest frequency
/// assert!(cache.contains("a"));
/// assert!(!cache.contains("b"));
/// ```
#[derive(Debug, Clone)]
pub struct LfuCache {
    capacity: usize,
    frequencies: HashMap<String, u64>,
    buckets: BTreeMap<u64, VecDeque<String>>,
    min_freq: u64,
}

impl LfuCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            frequencies: HashMap::with_capacity(capacity),
            buckets: BTreeMap::new(),
            min_freq: 0,
        }
    }

    /// Current access count of a resident key.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.frequencies.get(key).copied()
    }

    /// The bucket the next eviction is expected to draw from.
    pub fn min_frequency(&self) -> u64 {
        self.min_freq
    }

    fn detach(&mut self, key: &str, freq: u64) {
        let bucket = self
            .buckets
            .get_mut(&freq)
            .unwrap_or_else(|| panic!("lfu bucket {freq} missing for resident key `{key}`"));
        let removed = remove_key(bucket, key);
        assert!(removed, "lfu key `{key}` missing from bucket {freq}");
        if bucket.is_empty() {
            self.buckets.remove(&freq);
        }
    }
}

impl CachePolicy for LfuCache {
    fn add(&mut self, key: &str) {
        if self.frequencies.contains_key(key) {
            return;
        }
        if self.frequencies.len() >= self.capacity {
            self.evict();
        }
        self.frequencies.insert(key.to_string(), 1);
        self.buckets.entry(1).or_default().push_back(key.to_string());
        self.min_freq = 1;
    }

    fn access(&mut self, key: &str) -> bool {
        let Some(&freq) = self.frequencies.get(key) else {
            return false;
        };
        self.detach(key, freq);
        if freq == self.min_freq && !self.buckets.contains_key(&freq) {
            self.min_freq += 1;
        }
        let next = freq.saturating_add(1);
        self.frequencies.insert(key.to_string(), next);
        self.buckets.entry(next).or_default().push_back(key.to_string());
        true
    }

    fn evict(&mut self) -> Option<String> {
        if !self.buckets.contains_key(&self.min_freq) {
            self.min_freq = *self.buckets.keys().next()?;
        }
        let freq = self.min_freq;
        let bucket = self.buckets.get_mut(&freq)?;
        let victim = bucket.pop_front()?;
        if bucket.is_empty() {
            self.buckets.remove(&freq);
        }
        let tracked = self.frequencies.remove(&victim);
        assert_eq!(
            tracked,
            Some(freq),
            "lfu evicted `{victim}` from bucket {freq} but its recorded frequency disagrees"
        );
        trace!(policy = "lfu", key = %victim, frequency = freq, "evicted");
        Some(victim)
    }

    fn remove(&mut self, key: &str) {
        let Some(freq) = self.frequencies.remove(key) else {
            return;
        };
        self.detach(key, freq);
        if freq == self.min_freq && !self.buckets.contains_key(&freq) {
            self.min_freq += 1;
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.frequencies.contains_key(key)
    }

    fn len(&self) -> usize {
        self.frequencies.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn resident_keys(&self) -> HashSet<String> {
        self.frequencies.keys().cloned().collect()
    }

    fn name(&self) -> &'static str {
        "lfu"
    }
}
