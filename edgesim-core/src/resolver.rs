use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::router::Scheduler;
use crate::stats::{LatencySummary, NodeReport, RunStats, RunSummary};
use crate::{latency_for_distance, Lookup, Node, Position};

/// One unit of workload: `user` at `position` asks for `key`.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub user: String,
    pub key: String,
    pub position: Position,
}

impl Request {
    pub fn new(user: impl Into<String>, key: impl Into<String>, position: Position) -> Self {
        Self {
            user: user.into(),
            key: key.into(),
            position,
        }
    }
}

/// Terminal state of a resolved request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Served from the routed node's store.
    HitLocal,
    /// Fetched from the origin and admitted at the routed node.
    HitOrigin,
    /// Not routed, or not found at the node nor at the origin.
    Miss,
}

/// What happened to one request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestRecord {
    pub user: String,
    pub key: String,
    /// Id of the node the router picked; `None` if routing failed.
    pub node: Option<usize>,
    pub latency: f64,
    pub outcome: Outcome,
}

/// Drives requests through a router and the node/origin hierarchy.
///
/// # Resolution
///
/// For each request the router picks a node, the node looks the key up in its
/// own store and, on a miss, at the origin. Latency is derived from distances
/// with [`latency_for_distance`]:
///
/// | Outcome     | Latency                                   |
/// |-------------|-------------------------------------------|
/// | `HitLocal`  | `f(user → node)`                          |
/// | `HitOrigin` | `f(user → node) + f(node → origin)`       |
/// | `Miss`      | `f(user → node)`, or `0` if not routed    |
///
/// A request is attempted exactly once; misses are never re-routed.
///
/// # Thread Safety
///
/// `resolve` takes `&self`: run totals are atomics, per-node and per-item
/// tallies live in `DashMap`s, and the record log sits behind a
/// `parking_lot::Mutex`. Node stores and router state carry their own locks,
/// so [`run_parallel`](Self::run_parallel) can resolve a batch concurrently.
pub struct Resolver {
    router: Box<dyn Scheduler>,
    stats: RunStats,
    routed: DashMap<usize, u64>,
    item_requests: DashMap<String, u64>,
    records: Mutex<Vec<RequestRecord>>,
}

impl Resolver {
    pub fn new(router: Box<dyn Scheduler>) -> Self {
        Self {
            router,
            stats: RunStats::new(),
            routed: DashMap::new(),
            item_requests: DashMap::new(),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Resolves a single request and records its outcome.
    pub fn resolve(&self, user: &str, key: &str, position: Position) -> RequestRecord {
        *self.item_requests.entry(key.to_string()).or_insert(0) += 1;

        let record = match self.router.next_node(position) {
            Some(node) => self.resolve_at(&node, user, key, position),
            None => {
                debug!(user, key, "no node available, recording miss");
                self.stats.record_miss();
                RequestRecord {
                    user: user.to_string(),
                    key: key.to_string(),
                    node: None,
                    latency: 0.0,
                    outcome: Outcome::Miss,
                }
            }
        };

        self.records.lock().push(record.clone());
        record
    }

    fn resolve_at(&self, node: &Arc<Node>, user: &str, key: &str, position: Position) -> RequestRecord {
        *self.routed.entry(node.id()).or_insert(0) += 1;
        let to_node = latency_for_distance(node.distance_to(position));

        let (outcome, latency) = match node.process_request(key) {
            Lookup::Local => {
                self.stats.record_local_hit();
                (Outcome::HitLocal, to_node)
            }
            Lookup::Origin => {
                self.stats.record_origin_hit();
                let to_origin = node
                    .origin_node()
                    .map(|origin| latency_for_distance(node.distance_to(origin.position())))
                    .unwrap_or(0.0);
                (Outcome::HitOrigin, to_node + to_origin)
            }
            Lookup::NotFound => {
                self.stats.record_miss();
                (Outcome::Miss, to_node)
            }
        };

        RequestRecord {
            user: user.to_string(),
            key: key.to_string(),
            node: Some(node.id()),
            latency,
            outcome,
        }
    }

    /// Resolves requests one after another, in order.
    pub fn run<I>(&self, requests: I) -> RunSummary
    where
        I: IntoIterator<Item = Request>,
    {
        for request in requests {
            self.resolve(&request.user, &request.key, request.position);
        }
        self.finish()
    }

    /// Resolves a batch on the rayon thread pool.
    ///
    /// Records are appended in completion order. Outcomes depend on
    /// interleaving, so this is for throughput/contention experiments rather
    /// than reproducible comparisons.
    pub fn run_parallel(&self, requests: &[Request]) -> RunSummary {
        requests.par_iter().for_each(|request| {
            self.resolve(&request.user, &request.key, request.position);
        });
        self.finish()
    }

    fn finish(&self) -> RunSummary {
        let summary = self.summary();
        info!(
            router = self.router.name(),
            requests = summary.total_requests,
            hits = summary.total_hits,
            origin_hits = summary.origin_hits,
            misses = summary.total_misses,
            mean_latency = summary.latency.mean,
            "run complete"
        );
        summary
    }

    /// Totals and latency statistics over every request resolved so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_requests: self.stats.total_requests(),
            total_hits: self.stats.hits(),
            origin_hits: self.stats.origin_hits(),
            total_misses: self.stats.misses(),
            hit_rate: self.stats.hit_rate(),
            latency: LatencySummary::from_samples(&self.latencies()),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Per-request latencies in record order.
    pub fn latencies(&self) -> Vec<f64> {
        self.records.lock().iter().map(|r| r.latency).collect()
    }

    pub fn records(&self) -> Vec<RequestRecord> {
        self.records.lock().clone()
    }

    /// One report per routed-to node, in router order.
    pub fn node_reports(&self) -> Vec<NodeReport> {
        self.router
            .nodes()
            .iter()
            .map(|node| NodeReport {
                id: node.id(),
                routed: self.routed.get(&node.id()).map(|n| *n).unwrap_or(0),
                request_count: node.request_count(),
                local_hits: node.local_hits(),
                cached: node.cached_len(),
            })
            .collect()
    }

    /// How many times each item key was requested.
    pub fn item_request_counts(&self) -> HashMap<String, u64> {
        self.item_requests
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn router(&self) -> &dyn Scheduler {
        self.router.as_ref()
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        self.router.nodes()
    }

    /// Clears run totals, tallies, records and node counters. Cache contents
    /// and router state are kept.
    pub fn reset(&self) {
        self.stats.reset();
        self.routed.clear();
        self.item_requests.clear();
        self.records.lock().clear();
        for node in self.router.nodes() {
            node.reset_counters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{NearestNodeScheduler, RoundRobinScheduler};
    use crate::{CacheStore, EvictionPolicy};

    fn single_edge(policy: EvictionPolicy, capacity: usize) -> (Arc<Node>, Resolver) {
        let origin = Arc::new(Node::origin(0, Position::new(0.0, 0.0), ["A", "B", "C"]));
        let store = CacheStore::new(policy, capacity).unwrap();
        let edge = Arc::new(Node::edge(1, Position::new(1500.0, 0.0), store, &origin));
        let router = NearestNodeScheduler::new(vec![edge]).unwrap();
        (origin, Resolver::new(Box::new(router)))
    }

    #[test]
    fn test_origin_hit_latency_adds_both_hops() {
        let (_origin, resolver) = single_edge(EvictionPolicy::LRU, 2);
        // user sits 1500 from the edge; edge sits 1500 from the origin
        let record = resolver.resolve("u1", "A", Position::new(3000.0, 0.0));
        assert_eq!(record.outcome, Outcome::HitOrigin);
        assert_eq!(record.latency, 6.0);
        assert_eq!(record.node, Some(1));
    }

    #[test]
    fn test_local_hit_latency() {
        let (_origin, resolver) = single_edge(EvictionPolicy::LRU, 2);
        resolver.resolve("u1", "A", Position::new(3000.0, 0.0));
        let record = resolver.resolve("u1", "A", Position::new(3000.0, 0.0));
        assert_eq!(record.outcome, Outcome::HitLocal);
        assert_eq!(record.latency, 3.0);
    }

    #[test]
    fn test_miss_latency_is_user_hop() {
        let (_origin, resolver) = single_edge(EvictionPolicy::LRU, 2);
        let record = resolver.resolve("u1", "nope", Position::new(2500.0, 0.0));
        assert_eq!(record.outcome, Outcome::Miss);
        assert_eq!(record.latency, 2.0);
        assert_eq!(resolver.stats().misses(), 1);
    }

    #[test]
    fn test_routing_failure_records_zero_latency_miss() {
        struct NoRoute;
        impl Scheduler for NoRoute {
            fn next_node(&self, _user: Position) -> Option<Arc<Node>> {
                None
            }
            fn nodes(&self) -> &[Arc<Node>] {
                &[]
            }
            fn name(&self) -> &'static str {
                "none"
            }
        }

        let resolver = Resolver::new(Box::new(NoRoute));
        let record = resolver.resolve("u1", "A", Position::ORIGIN);
        assert_eq!(record.outcome, Outcome::Miss);
        assert_eq!(record.latency, 0.0);
        assert_eq!(record.node, None);
        assert_eq!(resolver.summary().total_misses, 1);
    }

    #[test]
    fn test_routed_tally_and_reset() {
        let origin = Arc::new(Node::origin(0, Position::ORIGIN, ["A"]));
        let nodes: Vec<Arc<Node>> = (1..=2)
            .map(|id| {
                let store = CacheStore::new(EvictionPolicy::FIFO, 1).unwrap();
                Arc::new(Node::edge(id, Position::new(id as f64, 0.0), store, &origin))
            })
            .collect();
        let resolver = Resolver::new(Box::new(RoundRobinScheduler::new(nodes).unwrap()));
        for _ in 0..5 {
            resolver.resolve("u", "A", Position::ORIGIN);
        }
        let reports = resolver.node_reports();
        assert_eq!(reports[0].routed, 3);
        assert_eq!(reports[1].routed, 2);
        assert_eq!(resolver.item_request_counts()["A"], 5);

        resolver.reset();
        assert_eq!(resolver.summary().total_requests, 0);
        assert!(resolver.records().is_empty());
        assert!(resolver.node_reports().iter().all(|r| r.routed == 0 && r.request_count == 0));
        // Contents survive the reset
        assert!(resolver.nodes()[0].resident_keys().contains("A"));
    }
}
