use std::collections::HashSet;

use super::CachePolicy;

/// Unbounded resident set that never evicts.
///
/// Models the origin's authoritative catalog: every admitted key stays until it
/// is removed explicitly.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    keys: HashSet<String>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog pre-seeded with `keys`, admitted one by one.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgesim_core::policy::{CachePolicy, CatalogCache};
    ///
    /// let catalog = CatalogCache::seeded(["a", "b", "a"]);
    /// assert_eq!(catalog.len(), 2);
    /// ```
    pub fn seeded<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for key in keys {
            catalog.add(key.as_ref());
        }
        catalog
    }
}

impl CachePolicy for CatalogCache {
    fn add(&mut self, key: &str) {
        if !self.keys.contains(key) {
            self.keys.insert(key.to_string());
        }
    }

    fn access(&mut self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn evict(&mut self) -> Option<String> {
        None
    }

    fn remove(&mut self, key: &str) {
        self.keys.remove(key);
    }

    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn resident_keys(&self) -> HashSet<String> {
        self.keys.clone()
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_evicts() {
        let mut catalog = CatalogCache::new();
        for i in 0..1_000 {
            catalog.add(&i.to_string());
        }
        assert_eq!(catalog.len(), 1_000);
        assert_eq!(catalog.evict(), None);
        assert_eq!(catalog.len(), 1_000);
    }

    #[test]
    fn test_access_and_remove() {
        let mut catalog = CatalogCache::seeded(["a", "b"]);
        assert!(catalog.access("a"));
        assert!(!catalog.access("c"));
        catalog.remove("a");
        assert!(!catalog.access("a"));
    }
}
