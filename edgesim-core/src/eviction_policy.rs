use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::policy::{
    ArcCache, CachePolicy, CatalogCache, LfuCache, NullCache, OrderedCache, RandomCache,
};
use crate::ConfigError;

/// Represents the policy a node's cache store uses when it reaches its capacity.
///
/// # Variants
///
/// * `FIFO` - **First In, First Out**
///   - The oldest inserted key is evicted first
///   - Accessing a key does NOT change its position
///
/// * `LRU` - **Least Recently Used** (default)
///   - Accessing a key moves it to the "most recent" position
///   - The least recently accessed key is evicted first
///
/// * `LFU` - **Least Frequently Used**
///   - Each hit increments the key's frequency
///   - The oldest key at the minimum frequency is evicted first
///
/// * `ARC` - **Adaptive Replacement Cache** (two-queue form)
///   - Keys move from T1 to T2 on their first hit after admission
///   - T1 is always drained before T2
///
/// * `Random` - **Random Replacement**
///   - The victim is drawn uniformly from the resident set
///
/// * `Catalog` - unbounded store that never evicts (the origin)
///
/// * `None` - no caching at all; every access misses
///
/// # Examples
///
/// ```
/// use edgesim_core::EvictionPolicy;
///
/// let policy: EvictionPolicy = "lru".parse().unwrap();
/// assert_eq!(policy, EvictionPolicy::LRU);
///
/// let rr: EvictionPolicy = "RR".parse().unwrap();
/// assert_eq!(rr, EvictionPolicy::Random);
///
/// assert!("mru".parse::<EvictionPolicy>().is_err());
/// assert_eq!(EvictionPolicy::default(), EvictionPolicy::LRU);
/// ```
///
/// # Performance Characteristics
///
/// | Policy  | Eviction | Cache Hit | Use Case |
/// |---------|----------|-----------|----------|
/// | FIFO    | O(1)     | O(1)      | Simple, predictable caching |
/// | LRU     | O(1)     | O(n)      | Workloads with temporal locality |
/// | LFU     | O(log n) | O(n)      | Skewed (Zipf-like) popularity |
/// | ARC     | O(1)     | O(n)      | Mixed recency/frequency |
/// | Random  | O(1)     | O(1)      | Baseline |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EvictionPolicy {
    FIFO,
    #[default]
    LRU,
    LFU,
    ARC,
    Random,
    Catalog,
    None,
}

static POLICY_TABLE: Lazy<HashMap<&'static str, EvictionPolicy>> = Lazy::new(|| {
    HashMap::from([
        ("fifo", EvictionPolicy::FIFO),
        ("lru", EvictionPolicy::LRU),
        ("lfu", EvictionPolicy::LFU),
        ("arc", EvictionPolicy::ARC),
        ("random", EvictionPolicy::Random),
        ("rr", EvictionPolicy::Random),
        ("catalog", EvictionPolicy::Catalog),
        ("unbounded", EvictionPolicy::Catalog),
        ("simple", EvictionPolicy::Catalog),
        ("none", EvictionPolicy::None),
        ("null", EvictionPolicy::None),
        ("nocache", EvictionPolicy::None),
    ])
});

impl EvictionPolicy {
    /// Bounded policies compared in experiments, in a stable order.
    pub const BOUNDED: [EvictionPolicy; 5] = [
        EvictionPolicy::FIFO,
        EvictionPolicy::LRU,
        EvictionPolicy::LFU,
        EvictionPolicy::ARC,
        EvictionPolicy::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::FIFO => "fifo",
            EvictionPolicy::LRU => "lru",
            EvictionPolicy::LFU => "lfu",
            EvictionPolicy::ARC => "arc",
            EvictionPolicy::Random => "random",
            EvictionPolicy::Catalog => "catalog",
            EvictionPolicy::None => "none",
        }
    }

    /// Whether this policy enforces a capacity.
    pub fn is_bounded(&self) -> bool {
        !matches!(self, EvictionPolicy::Catalog | EvictionPolicy::None)
    }

    /// Creates an empty store for this policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] for a bounded policy with `capacity == 0`.
    /// `Catalog` and `None` ignore the capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgesim_core::EvictionPolicy;
    ///
    /// let mut store = EvictionPolicy::FIFO.build(2).unwrap();
    /// store.add("a");
    /// assert!(store.access("a"));
    /// assert_eq!(store.capacity(), Some(2));
    /// ```
    pub fn build(&self, capacity: usize) -> Result<Box<dyn CachePolicy>, ConfigError> {
        self.build_with_seed(capacity, None)
    }

    /// Like [`build`](Self::build), with a fixed seed for the `Random` policy.
    pub fn build_with_seed(
        &self,
        capacity: usize,
        seed: Option<u64>,
    ) -> Result<Box<dyn CachePolicy>, ConfigError> {
        if self.is_bounded() && capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let policy: Box<dyn CachePolicy> = match self {
            EvictionPolicy::FIFO => Box::new(OrderedCache::fifo(capacity)),
            EvictionPolicy::LRU => Box::new(OrderedCache::lru(capacity)),
            EvictionPolicy::LFU => Box::new(LfuCache::new(capacity)),
            EvictionPolicy::ARC => Box::new(ArcCache::new(capacity)),
            EvictionPolicy::Random => match seed {
                Some(seed) => Box::new(RandomCache::with_seed(capacity, seed)),
                None => Box::new(RandomCache::new(capacity)),
            },
            EvictionPolicy::Catalog => Box::new(CatalogCache::new()),
            EvictionPolicy::None => Box::new(NullCache),
        };
        Ok(policy)
    }
}

/// Parses a policy name. The lookup is case-insensitive.
///
/// # Supported Values
///
/// - `"fifo"`, `"lru"`, `"lfu"`, `"arc"`
/// - `"random"` or `"rr"` → `EvictionPolicy::Random`
/// - `"catalog"`, `"unbounded"` or `"simple"` → `EvictionPolicy::Catalog`
/// - `"none"`, `"null"` or `"nocache"` → `EvictionPolicy::None`
impl FromStr for EvictionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        POLICY_TABLE
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| ConfigError::UnknownPolicy(s.to_string()))
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("FIFO".parse::<EvictionPolicy>(), Ok(EvictionPolicy::FIFO));
        assert_eq!(" Arc ".parse::<EvictionPolicy>(), Ok(EvictionPolicy::ARC));
        assert_eq!("NoCache".parse::<EvictionPolicy>(), Ok(EvictionPolicy::None));
    }

    #[test]
    fn test_unknown_policy() {
        assert_eq!(
            "tlru".parse::<EvictionPolicy>(),
            Err(ConfigError::UnknownPolicy("tlru".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_table() {
        for policy in EvictionPolicy::BOUNDED {
            assert_eq!(policy.to_string().parse::<EvictionPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_zero_capacity_rejected_for_bounded() {
        for policy in EvictionPolicy::BOUNDED {
            assert_eq!(policy.build(0).err(), Some(ConfigError::ZeroCapacity));
        }
        assert!(EvictionPolicy::Catalog.build(0).is_ok());
        assert!(EvictionPolicy::None.build(0).is_ok());
    }

    #[test]
    fn test_build_names() {
        assert_eq!(EvictionPolicy::LRU.build(1).unwrap().name(), "lru");
        assert_eq!(EvictionPolicy::FIFO.build(1).unwrap().name(), "fifo");
        assert_eq!(EvictionPolicy::Catalog.build(1).unwrap().capacity(), None);
    }
}
