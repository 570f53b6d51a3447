//! Routing decisions of the three schedulers

use std::collections::HashMap;
use std::sync::Arc;

use edgesim::router::{
    DistanceAdaptiveScheduler, NearestNodeScheduler, RoundRobinScheduler, Scheduler,
};
use edgesim::{CacheStore, EvictionPolicy, Node, Position};

fn node(id: usize, x: f64, y: f64) -> Arc<Node> {
    let store = CacheStore::new(EvictionPolicy::LRU, 4).unwrap();
    Arc::new(Node::standalone(id, Position::new(x, y), store))
}

// Distances 10, 10 and 100 from the origin
fn triangle() -> Vec<Arc<Node>> {
    vec![node(0, 10.0, 0.0), node(1, 0.0, 10.0), node(2, 100.0, 0.0)]
}

#[test]
fn test_adaptive_never_picks_outside_band() {
    let router = DistanceAdaptiveScheduler::with_seed(triangle(), 50.0, 0.1, 99).unwrap();
    let mut picks: HashMap<usize, usize> = HashMap::new();
    for _ in 0..200 {
        let chosen = router.next_node(Position::ORIGIN).unwrap();
        *picks.entry(chosen.id()).or_insert(0) += 1;
    }
    assert!(!picks.contains_key(&2));
    // Both equidistant nodes get picked
    assert!(picks[&0] > 0 && picks[&1] > 0);
}

#[test]
fn test_adaptive_prefers_idle_node() {
    let nodes = triangle();
    // Zero factor keeps the band at 50 despite the imbalance
    let router = DistanceAdaptiveScheduler::with_seed(nodes.clone(), 50.0, 0.0, 5).unwrap();
    let _first = nodes[0].hold_connection();
    let _second = nodes[0].hold_connection();
    assert_eq!(nodes[0].active_connections(), 2);
    for _ in 0..20 {
        assert_eq!(router.next_node(Position::ORIGIN).unwrap().id(), 1);
    }
}

#[test]
fn test_adaptive_wide_band_spreads_load() {
    let nodes = triangle();
    let router = DistanceAdaptiveScheduler::with_seed(nodes.clone(), 1000.0, 0.0, 5).unwrap();
    // Both near nodes busy; the far node is the least loaded candidate
    let _a = nodes[0].hold_connection();
    let _b = nodes[1].hold_connection();
    assert_eq!(router.next_node(Position::ORIGIN).unwrap().id(), 2);
    assert_eq!(router.threshold(), 1000.0);
}

#[test]
fn test_guard_release_restores_load() {
    let nodes = triangle();
    {
        let _guard = nodes[1].hold_connection();
        assert_eq!(nodes[1].active_connections(), 1);
    }
    assert_eq!(nodes[1].active_connections(), 0);
}

#[test]
fn test_nearest_follows_user() {
    let router = NearestNodeScheduler::new(triangle()).unwrap();
    assert_eq!(router.next_node(Position::new(90.0, 0.0)).unwrap().id(), 2);
    assert_eq!(router.next_node(Position::new(0.0, 12.0)).unwrap().id(), 1);
}

#[test]
fn test_round_robin_is_fair() {
    let router = RoundRobinScheduler::new(triangle()).unwrap();
    let mut picks = [0usize; 3];
    for i in 0..300 {
        let user = Position::new(i as f64, 0.0);
        picks[router.next_node(user).unwrap().id()] += 1;
    }
    assert_eq!(picks, [100, 100, 100]);
}

#[test]
fn test_adaptive_concurrent_routing() {
    use std::thread;

    let router = Arc::new(DistanceAdaptiveScheduler::new(triangle()).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for _ in 0..100 {
                    let node = router.next_node(Position::ORIGIN).unwrap();
                    node.process_request("missing");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let threshold = router.threshold();
    assert!((50.0..=1000.0).contains(&threshold));
    assert!(router.nodes().iter().all(|n| n.active_connections() == 0));
}
