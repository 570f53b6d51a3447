use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::{CacheStore, Position};

/// Where a node found a requested key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Resident in the node's own store.
    Local,
    /// Fetched from the origin (and admitted locally).
    Origin,
    /// Absent locally and at the origin, or no origin to ask.
    NotFound,
}

impl Lookup {
    pub fn found(self) -> bool {
        !matches!(self, Lookup::NotFound)
    }

    pub fn is_local(self) -> bool {
        matches!(self, Lookup::Local)
    }
}

/// A cache node: an edge node with a bounded store, or the origin with the
/// full catalog.
///
/// Each node owns its [`CacheStore`] behind a `parking_lot::Mutex`, so all
/// mutations of one node's cache are serialized while different nodes proceed
/// independently. Counters are atomics.
///
/// Edge nodes hold a [`Weak`] reference to the origin: the simulation harness
/// owns the origin, and a dropped origin simply means "no fallback".
///
/// # Counters
///
/// * `request_count` - requests satisfied through this node (local hits plus
///   origin fetches this node admitted)
/// * `local_hits` - requests answered from the node's own store
/// * `active_connections` - requests currently in flight; read by routers
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use edgesim_core::{CacheStore, EvictionPolicy, Lookup, Node, Position};
///
/// let origin = Arc::new(Node::origin(0, Position::ORIGIN, ["a", "b"]));
/// let store = CacheStore::new(EvictionPolicy::LRU, 1).unwrap();
/// let edge = Node::edge(1, Position::new(10.0, 0.0), store, &origin);
///
/// assert_eq!(edge.process_request("a"), Lookup::Origin);
/// assert_eq!(edge.process_request("a"), Lookup::Local);
/// assert_eq!(edge.process_request("zzz"), Lookup::NotFound);
/// ```
#[derive(Debug)]
pub struct Node {
    id: usize,
    position: Position,
    store: Mutex<CacheStore>,
    origin: Option<Weak<Node>>,
    request_count: AtomicU64,
    local_hits: AtomicU64,
    active_connections: AtomicUsize,
}

/// Holds one unit of a node's `active_connections` for as long as it lives.
#[must_use = "the connection is released as soon as the guard is dropped"]
pub struct ConnectionGuard<'a>(&'a AtomicUsize);

impl<'a> ConnectionGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

impl Node {
    /// Creates the origin: an unbounded catalog pre-seeded with `catalog`.
    pub fn origin<I, S>(id: usize, position: Position, catalog: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(id, position, CacheStore::catalog(catalog), None)
    }

    /// Creates an edge node that falls back to `origin` on a miss.
    pub fn edge(id: usize, position: Position, store: CacheStore, origin: &Arc<Node>) -> Self {
        Self::build(id, position, store, Some(Arc::downgrade(origin)))
    }

    /// Creates a node with no origin reference.
    pub fn standalone(id: usize, position: Position, store: CacheStore) -> Self {
        Self::build(id, position, store, None)
    }

    fn build(
        id: usize,
        position: Position,
        store: CacheStore,
        origin: Option<Weak<Node>>,
    ) -> Self {
        Self {
            id,
            position,
            store: Mutex::new(store),
            origin,
            request_count: AtomicU64::new(0),
            local_hits: AtomicU64::new(0),
            active_connections: AtomicUsize::new(0),
        }
    }

    /// Resolves `key` against this node, falling back to the origin.
    ///
    /// # Behavior
    ///
    /// 1. `active_connections` is raised for the whole call and released on
    ///    every exit path.
    /// 2. A local hit bumps `request_count` and `local_hits` and returns
    ///    [`Lookup::Local`].
    /// 3. On a local miss the origin is asked (the local lock is not held while
    ///    waiting on the origin). If it has the key, [`Lookup::Origin`] is
    ///    returned and the key is admitted here, bumping `request_count`,
    ///    unless a concurrent request already admitted it.
    /// 4. Otherwise [`Lookup::NotFound`].
    pub fn process_request(&self, key: &str) -> Lookup {
        let _connection = self.hold_connection();

        if self.store.lock().access(key) {
            self.request_count.fetch_add(1, Ordering::Relaxed);
            self.local_hits.fetch_add(1, Ordering::Relaxed);
            return Lookup::Local;
        }

        let Some(origin) = self.origin_node() else {
            return Lookup::NotFound;
        };
        if !origin.process_request(key).found() {
            return Lookup::NotFound;
        }

        let mut store = self.store.lock();
        if !store.access(key) {
            store.add(key);
            self.request_count.fetch_add(1, Ordering::Relaxed);
            debug!(node = self.id, key, resident = store.len(), "admitted from origin");
        }
        Lookup::Origin
    }

    /// Marks one request as in flight until the returned guard is dropped.
    ///
    /// `process_request` does this internally; external callers use it to
    /// model load that is not a cache lookup.
    pub fn hold_connection(&self) -> ConnectionGuard<'_> {
        ConnectionGuard::acquire(&self.active_connections)
    }

    /// Admits `key` through the node's policy (warm start / tests).
    pub fn add_file(&self, key: &str) {
        self.store.lock().add(key);
    }

    /// Replays `add_file` for each key, in order.
    pub fn warm<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.lock().warm(keys);
    }

    /// Forcibly removes `key` from the node's store.
    pub fn remove_file(&self, key: &str) {
        self.store.lock().remove(key);
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn distance_to(&self, position: Position) -> f64 {
        self.position.distance_to(position)
    }

    /// The origin this node falls back to, if it is still alive.
    pub fn origin_node(&self) -> Option<Arc<Node>> {
        self.origin.as_ref().and_then(Weak::upgrade)
    }

    /// Whether this node has no origin to fall back to, i.e. it is the
    /// authoritative store itself.
    pub fn is_origin(&self) -> bool {
        self.origin.is_none()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn local_hits(&self) -> u64 {
        self.local_hits.load(Ordering::Relaxed)
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Snapshot of the keys resident in this node's store.
    pub fn resident_keys(&self) -> HashSet<String> {
        self.store.lock().resident_keys()
    }

    pub fn cached_len(&self) -> usize {
        self.store.lock().len()
    }

    /// Clears request and hit counters. Cache contents are kept.
    pub fn reset_counters(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.local_hits.store(0, Ordering::Relaxed);
    }

    /// Runs `f` with exclusive access to the node's store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut CacheStore) -> R) -> R {
        f(&mut self.store.lock())
    }
}
