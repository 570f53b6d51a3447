//! Key-presence trackers with an eviction rule.
//!
//! Every policy implements [`CachePolicy`]. Policies only track item keys; there
//! is no payload. Construction goes through
//! [`EvictionPolicy::build`](crate::EvictionPolicy::build), which validates the
//! capacity and picks the implementation from the policy name.

pub mod arc;
pub mod catalog;
pub mod lfu;
pub mod null;
pub mod ordered;
pub mod random;

use std::collections::HashSet;

pub use arc::ArcCache;
pub use catalog::CatalogCache;
pub use lfu::LfuCache;
pub use null::NullCache;
pub use ordered::OrderedCache;
pub use random::RandomCache;

/// Uniform contract shared by all eviction policies.
///
/// # Contract
///
/// * `add` is idempotent: adding a resident key changes nothing. When the store
///   is full it evicts exactly one key first.
/// * `access` is the only hit/miss signal. A hit updates recency/frequency
///   metadata; a miss never mutates.
/// * `evict` removes exactly one key according to the policy rule, or returns
///   `None` when nothing is resident.
/// * `remove` drops a specific key; absent keys are ignored.
///
/// After any `add` or `evict`, `len() <= capacity()`.
pub trait CachePolicy: Send {
    /// Admits `key`, evicting first if the store is full.
    fn add(&mut self, key: &str);

    /// Returns `true` and updates metadata if `key` is resident.
    fn access(&mut self, key: &str) -> bool;

    /// Removes one key per the policy rule.
    fn evict(&mut self) -> Option<String>;

    /// Forced removal of a specific key.
    fn remove(&mut self, key: &str);

    /// Read-only residency check. Does not count as an access.
    fn contains(&self, key: &str) -> bool;

    /// Number of resident keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident keys, `None` when unbounded.
    fn capacity(&self) -> Option<usize>;

    /// Snapshot of the resident set.
    fn resident_keys(&self) -> HashSet<String>;

    /// Short policy name, used in log events.
    fn name(&self) -> &'static str;
}
