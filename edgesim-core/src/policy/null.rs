use std::collections::HashSet;

use super::CachePolicy;

/// Cache that holds nothing: every access misses and admissions are dropped.
///
/// Used to measure the no-caching baseline where every request goes to the
/// origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl CachePolicy for NullCache {
    fn add(&mut self, _key: &str) {}

    fn access(&mut self, _key: &str) -> bool {
        false
    }

    fn evict(&mut self) -> Option<String> {
        None
    }

    fn remove(&mut self, _key: &str) {}

    fn contains(&self, _key: &str) -> bool {
        false
    }

    fn len(&self) -> usize {
        0
    }

    fn capacity(&self) -> Option<usize> {
        Some(0)
    }

    fn resident_keys(&self) -> HashSet<String> {
        HashSet::new()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
