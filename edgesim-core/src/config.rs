use std::sync::Arc;

use tracing::debug;

use crate::router::{
    DistanceAdaptiveScheduler, NearestNodeScheduler, RoundRobinScheduler, Scheduler,
    SchedulerKind, DEFAULT_ADJUSTMENT_FACTOR, DEFAULT_THRESHOLD, MAX_THRESHOLD, MIN_THRESHOLD,
};
use crate::stats::{NodeReport, RunSummary};
use crate::{
    CacheStore, ConfigError, EvictionPolicy, Node, Position, Request, RequestRecord, Resolver,
};

/// Id given to the origin; edge nodes are numbered from 1.
pub const ORIGIN_ID: usize = 0;

/// Parameters of one simulation run.
///
/// # Examples
///
/// ```
/// use edgesim_core::{EvictionPolicy, SimulationConfig};
/// use edgesim_core::router::SchedulerKind;
///
/// let config = SimulationConfig {
///     capacity: 20,
///     policy: "arc".parse().unwrap(),
///     scheduler: SchedulerKind::Nearest,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.policy, EvictionPolicy::ARC);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Per-edge-node cache capacity.
    pub capacity: usize,
    /// Eviction policy of every edge node.
    pub policy: EvictionPolicy,
    pub scheduler: SchedulerKind,
    /// Starting distance band of the adaptive scheduler.
    pub initial_threshold: f64,
    pub adjustment_factor: f64,
    pub origin_position: Position,
    /// Fixes the random policy and router tie-breaks when set.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            policy: EvictionPolicy::default(),
            scheduler: SchedulerKind::default(),
            initial_threshold: DEFAULT_THRESHOLD,
            adjustment_factor: DEFAULT_ADJUSTMENT_FACTOR,
            origin_position: Position::ORIGIN,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.is_bounded() && self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.initial_threshold) {
            return Err(ConfigError::InvalidThreshold(self.initial_threshold));
        }
        if !(0.0..1.0).contains(&self.adjustment_factor) {
            return Err(ConfigError::InvalidAdjustmentFactor(self.adjustment_factor));
        }
        Ok(())
    }

    fn build_router(&self, nodes: Vec<Arc<Node>>) -> Result<Box<dyn Scheduler>, ConfigError> {
        let router: Box<dyn Scheduler> = match self.scheduler {
            SchedulerKind::DistanceAdaptive => match self.seed {
                Some(seed) => Box::new(DistanceAdaptiveScheduler::with_seed(
                    nodes,
                    self.initial_threshold,
                    self.adjustment_factor,
                    seed,
                )?),
                None => Box::new(DistanceAdaptiveScheduler::with_params(
                    nodes,
                    self.initial_threshold,
                    self.adjustment_factor,
                )?),
            },
            SchedulerKind::Nearest => Box::new(NearestNodeScheduler::new(nodes)?),
            SchedulerKind::RoundRobin => Box::new(RoundRobinScheduler::new(nodes)?),
        };
        Ok(router)
    }
}

/// A ready-to-run hierarchy: the origin, the edge nodes, the router and the
/// resolver that ties them together.
///
/// The simulation owns the origin; edge nodes only hold a weak reference to it.
///
/// # Examples
///
/// ```
/// use edgesim_core::{Position, Request, Simulation, SimulationConfig};
///
/// let config = SimulationConfig { capacity: 2, ..Default::default() };
/// let sim = Simulation::build(
///     &config,
///     ["a", "b", "c"],
///     &[Position::new(100.0, 0.0)],
///     ["a"],
/// )
/// .unwrap();
///
/// let summary = sim.run(vec![
///     Request::new("u1", "a", Position::new(100.0, 0.0)),
///     Request::new("u1", "b", Position::new(100.0, 0.0)),
/// ]);
/// assert_eq!(summary.total_hits, 1);
/// assert_eq!(summary.origin_hits, 1);
/// ```
pub struct Simulation {
    origin: Arc<Node>,
    resolver: Resolver,
}

impl Simulation {
    /// Builds the hierarchy.
    ///
    /// * `catalog` seeds the origin's unbounded store.
    /// * one edge node is created per entry of `edge_positions`, each
    ///   warm-started by replaying `popular` through its policy.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`SimulationConfig::validate`], and
    /// [`ConfigError::EmptyNodeList`] when `edge_positions` is empty.
    pub fn build<C, CS, P, PS>(
        config: &SimulationConfig,
        catalog: C,
        edge_positions: &[Position],
        popular: P,
    ) -> Result<Self, ConfigError>
    where
        C: IntoIterator<Item = CS>,
        CS: AsRef<str>,
        P: IntoIterator<Item = PS>,
        PS: AsRef<str>,
    {
        config.validate()?;
        if edge_positions.is_empty() {
            return Err(ConfigError::EmptyNodeList);
        }

        let origin = Arc::new(Node::origin(ORIGIN_ID, config.origin_position, catalog));
        let popular: Vec<String> = popular.into_iter().map(|k| k.as_ref().to_string()).collect();

        let mut nodes = Vec::with_capacity(edge_positions.len());
        for (idx, &position) in edge_positions.iter().enumerate() {
            let id = idx + 1;
            let seed = config.seed.map(|s| s.wrapping_add(id as u64));
            let store = CacheStore::with_seed(config.policy, config.capacity, seed)?;
            let node = Node::edge(id, position, store, &origin);
            node.warm(&popular);
            nodes.push(Arc::new(node));
        }

        debug!(
            nodes = nodes.len(),
            catalog = origin.cached_len(),
            policy = %config.policy,
            scheduler = %config.scheduler,
            "simulation built"
        );

        let router = config.build_router(nodes)?;
        Ok(Self {
            origin,
            resolver: Resolver::new(router),
        })
    }

    pub fn origin(&self) -> &Arc<Node> {
        &self.origin
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        self.resolver.nodes()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolve(&self, user: &str, key: &str, position: Position) -> RequestRecord {
        self.resolver.resolve(user, key, position)
    }

    pub fn run<I>(&self, requests: I) -> RunSummary
    where
        I: IntoIterator<Item = Request>,
    {
        self.resolver.run(requests)
    }

    pub fn run_parallel(&self, requests: &[Request]) -> RunSummary {
        self.resolver.run_parallel(requests)
    }

    pub fn summary(&self) -> RunSummary {
        self.resolver.summary()
    }

    pub fn node_reports(&self) -> Vec<NodeReport> {
        self.resolver.node_reports()
    }

    /// Clears all counters (edge nodes, origin, run totals). Cache contents stay.
    pub fn reset(&self) {
        self.resolver.reset();
        self.origin.reset_counters();
    }
}
