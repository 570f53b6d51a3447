use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::{nearest_index, Scheduler};
use crate::{ConfigError, Node, Position};

pub const MIN_THRESHOLD: f64 = 50.0;
pub const MAX_THRESHOLD: f64 = 1000.0;
pub const DEFAULT_THRESHOLD: f64 = 300.0;
pub const DEFAULT_ADJUSTMENT_FACTOR: f64 = 0.1;

/// Computes the next distance band from the current node loads.
///
/// If the busiest node carries more than 1.5x the load of the idlest one the
/// band widens by `factor`, otherwise it narrows by `factor`. The result is
/// clamped to `[50, 1000]`. An empty load list only clamps.
///
/// # Examples
///
/// ```
/// use edgesim_core::router::adjust_threshold;
///
/// // Balanced load narrows the band
/// assert!((adjust_threshold(300.0, &[2, 2, 2], 0.1) - 270.0).abs() < 1e-9);
/// // Imbalance widens it
/// assert!((adjust_threshold(300.0, &[4, 1], 0.1) - 330.0).abs() < 1e-9);
/// // Bounds hold
/// assert_eq!(adjust_threshold(52.0, &[0, 0], 0.5), 50.0);
/// assert_eq!(adjust_threshold(990.0, &[9, 1], 0.5), 1000.0);
/// ```
pub fn adjust_threshold(current: f64, loads: &[usize], factor: f64) -> f64 {
    let next = match (loads.iter().max(), loads.iter().min()) {
        (Some(&max), Some(&min)) if max as f64 > 1.5 * min as f64 => current * (1.0 + factor),
        (Some(_), Some(_)) => current * (1.0 - factor),
        _ => current,
    };
    next.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}

struct AdaptiveState {
    threshold: f64,
    rng: fastrand::Rng,
}

/// Distance-banded, load-aware router.
///
/// # Algorithm
///
/// 1. Compute the distance from the requester to every node; `d_min` is the smallest.
/// 2. Candidates are the nodes within `d_min + threshold`.
/// 3. Among candidates, keep those with the fewest `active_connections` and
///    pick one uniformly at random. (With no candidates, which only happens
///    for NaN positions, the nearest node is used.)
/// 4. Recompute the threshold with [`adjust_threshold`] from the loads of all
///    nodes.
///
/// The threshold and the tie-break RNG share one `parking_lot::Mutex`, so each
/// routing decision and the threshold update that follows it are applied by a
/// single writer at a time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use edgesim_core::router::{DistanceAdaptiveScheduler, Scheduler};
/// use edgesim_core::{CacheStore, EvictionPolicy, Node, Position};
///
/// let nodes: Vec<Arc<Node>> = [(0.0, 0.0), (5000.0, 0.0)]
///     .into_iter()
///     .enumerate()
///     .map(|(id, (x, y))| {
///         let store = CacheStore::new(EvictionPolicy::LRU, 8).unwrap();
///         Arc::new(Node::standalone(id, Position::new(x, y), store))
///     })
///     .collect();
///
/// let router = DistanceAdaptiveScheduler::new(nodes).unwrap();
/// let chosen = router.next_node(Position::new(10.0, 0.0)).unwrap();
/// assert_eq!(chosen.id(), 0);
/// ```
pub struct DistanceAdaptiveScheduler {
    nodes: Vec<Arc<Node>>,
    adjustment_factor: f64,
    state: Mutex<AdaptiveState>,
}

impl DistanceAdaptiveScheduler {
    pub fn new(nodes: Vec<Arc<Node>>) -> Result<Self, ConfigError> {
        Self::with_params(nodes, DEFAULT_THRESHOLD, DEFAULT_ADJUSTMENT_FACTOR)
    }

    /// # Errors
    ///
    /// * [`ConfigError::EmptyNodeList`] when `nodes` is empty
    /// * [`ConfigError::InvalidThreshold`] when `threshold` is outside `[50, 1000]`
    /// * [`ConfigError::InvalidAdjustmentFactor`] when `factor` is outside `[0, 1)`
    pub fn with_params(
        nodes: Vec<Arc<Node>>,
        threshold: f64,
        adjustment_factor: f64,
    ) -> Result<Self, ConfigError> {
        Self::build(nodes, threshold, adjustment_factor, fastrand::Rng::new())
    }

    /// Same as [`with_params`](Self::with_params) with a seeded tie-break RNG.
    pub fn with_seed(
        nodes: Vec<Arc<Node>>,
        threshold: f64,
        adjustment_factor: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(
            nodes,
            threshold,
            adjustment_factor,
            fastrand::Rng::with_seed(seed),
        )
    }

    fn build(
        nodes: Vec<Arc<Node>>,
        threshold: f64,
        adjustment_factor: f64,
        rng: fastrand::Rng,
    ) -> Result<Self, ConfigError> {
        if nodes.is_empty() {
            return Err(ConfigError::EmptyNodeList);
        }
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if !(0.0..1.0).contains(&adjustment_factor) {
            return Err(ConfigError::InvalidAdjustmentFactor(adjustment_factor));
        }
        Ok(Self {
            nodes,
            adjustment_factor,
            state: Mutex::new(AdaptiveState { threshold, rng }),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.state.lock().threshold
    }

    pub fn adjustment_factor(&self) -> f64 {
        self.adjustment_factor
    }

    /// Nodes within `d_min + threshold` of `user`, in node-list order.
    pub fn candidates(&self, user: Position) -> Vec<Arc<Node>> {
        let threshold = self.threshold();
        self.candidates_within(user, threshold)
    }

    fn candidates_within(&self, user: Position, threshold: f64) -> Vec<Arc<Node>> {
        let distances: Vec<f64> = self.nodes.iter().map(|n| n.distance_to(user)).collect();
        let d_min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        self.nodes
            .iter()
            .zip(distances)
            .filter(|(_, d)| *d <= d_min + threshold)
            .map(|(node, _)| Arc::clone(node))
            .collect()
    }

    fn loads(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.active_connections()).collect()
    }
}

impl Scheduler for DistanceAdaptiveScheduler {
    fn next_node(&self, user: Position) -> Option<Arc<Node>> {
        let mut state = self.state.lock();

        // Loads are read once so the minimum and the filter agree
        let loaded: Vec<(Arc<Node>, usize)> = self
            .candidates_within(user, state.threshold)
            .into_iter()
            .map(|node| {
                let load = node.active_connections();
                (node, load)
            })
            .collect();
        let selected = match loaded.iter().map(|(_, load)| *load).min() {
            Some(min_load) => {
                let lightest: Vec<&Arc<Node>> = loaded
                    .iter()
                    .filter(|(_, load)| *load == min_load)
                    .map(|(node, _)| node)
                    .collect();
                Arc::clone(lightest[state.rng.usize(..lightest.len())])
            }
            None => {
                let (idx, _) = nearest_index(&self.nodes, user)?;
                Arc::clone(&self.nodes[idx])
            }
        };

        let previous = state.threshold;
        state.threshold = adjust_threshold(previous, &self.loads(), self.adjustment_factor);
        trace!(
            node = selected.id(),
            previous,
            threshold = state.threshold,
            "threshold adjusted"
        );

        Some(selected)
    }

    fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    fn name(&self) -> &'static str {
        "distance"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::node_at;
    use super::*;
    use std::collections::HashSet;

    fn three_nodes() -> Vec<Arc<Node>> {
        // Distances 10, 10 and 100 from the origin
        vec![node_at(0, 10.0, 0.0), node_at(1, 0.0, 10.0), node_at(2, 100.0, 0.0)]
    }

    #[test]
    fn test_candidates_within_band() {
        let router = DistanceAdaptiveScheduler::with_params(three_nodes(), 50.0, 0.1).unwrap();
        let ids: Vec<usize> = router.candidates(Position::ORIGIN).iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_band_edge_is_inclusive() {
        let router = DistanceAdaptiveScheduler::with_params(three_nodes(), 90.0, 0.1).unwrap();
        assert_eq!(router.candidates(Position::ORIGIN).len(), 3);
    }

    #[test]
    fn test_equal_load_picks_among_nearest() {
        let mut seen = HashSet::new();
        for seed in 0..64 {
            let router =
                DistanceAdaptiveScheduler::with_seed(three_nodes(), 50.0, 0.1, seed).unwrap();
            seen.insert(router.next_node(Position::ORIGIN).unwrap().id());
        }
        assert_eq!(seen, HashSet::from([0, 1]));
    }

    #[test]
    fn test_prefers_lower_active_connections() {
        let nodes = three_nodes();
        // Imbalance would widen the band to the far node; keep it fixed
        let router = DistanceAdaptiveScheduler::with_params(nodes.clone(), 50.0, 0.0).unwrap();
        let _busy = nodes[0].hold_connection();
        for _ in 0..10 {
            assert_eq!(router.next_node(Position::ORIGIN).unwrap().id(), 1);
        }
    }

    #[test]
    fn test_busy_candidate_is_skipped_in_wide_band() {
        let nodes = three_nodes();
        let router = DistanceAdaptiveScheduler::with_seed(nodes.clone(), 1000.0, 0.0, 11).unwrap();
        assert_eq!(router.adjustment_factor(), 0.0);
        let _a = nodes[0].hold_connection();
        let _b = nodes[1].hold_connection();
        let _c = nodes[1].hold_connection();
        for _ in 0..10 {
            // Every candidate is busy; the least busy one still wins
            let _d = nodes[2].hold_connection();
            let _e = nodes[2].hold_connection();
            assert_eq!(router.next_node(Position::ORIGIN).unwrap().id(), 0);
        }
    }

    #[test]
    fn test_imbalance_widens_threshold() {
        let nodes = three_nodes();
        let router = DistanceAdaptiveScheduler::with_params(nodes.clone(), 100.0, 0.1).unwrap();
        let _busy = nodes[2].hold_connection();
        router.next_node(Position::ORIGIN);
        assert!((router.threshold() - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_shrinks_when_idle() {
        let router = DistanceAdaptiveScheduler::new(three_nodes()).unwrap();
        router.next_node(Position::ORIGIN);
        assert!((router.threshold() - 270.0).abs() < 1e-9);
        for _ in 0..100 {
            router.next_node(Position::ORIGIN);
        }
        assert_eq!(router.threshold(), MIN_THRESHOLD);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            DistanceAdaptiveScheduler::new(Vec::new()),
            Err(ConfigError::EmptyNodeList)
        ));
        assert!(matches!(
            DistanceAdaptiveScheduler::with_params(three_nodes(), 10.0, 0.1),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            DistanceAdaptiveScheduler::with_params(three_nodes(), 300.0, 1.5),
            Err(ConfigError::InvalidAdjustmentFactor(_))
        ));
    }

    #[test]
    fn test_adjust_threshold_all_idle() {
        // 0 > 1.5 * 0 is false: narrows
        assert!((adjust_threshold(100.0, &[0, 0, 0], 0.1) - 90.0).abs() < 1e-9);
        assert_eq!(adjust_threshold(100.0, &[], 0.1), 100.0);
        assert_eq!(adjust_threshold(2000.0, &[], 0.1), MAX_THRESHOLD);
    }

    #[test]
    fn test_adjust_threshold_imbalance_from_zero() {
        // Any load against an idle node counts as imbalance
        assert!((adjust_threshold(100.0, &[1, 0], 0.1) - 110.0).abs() < 1e-9);
    }
}
