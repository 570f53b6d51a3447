//! Request routers: map a requester position to the node that should serve it.
//!
//! - [`DistanceAdaptiveScheduler`] - nearest band of nodes, least loaded wins,
//!   band width adapts to load imbalance
//! - [`NearestNodeScheduler`] - strictly nearest node, load breaks exact ties
//! - [`RoundRobinScheduler`] - ignores position, cycles the node list

mod distance_adaptive;
mod nearest;
mod round_robin;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;

pub use distance_adaptive::{
    adjust_threshold, DistanceAdaptiveScheduler, DEFAULT_ADJUSTMENT_FACTOR, DEFAULT_THRESHOLD,
    MAX_THRESHOLD, MIN_THRESHOLD,
};
pub use nearest::NearestNodeScheduler;
pub use round_robin::RoundRobinScheduler;

use crate::{ConfigError, Node, Position};

/// Picks the node that serves a request.
///
/// Implementations share the node list with the simulation harness through
/// `Arc`s; routing only reads node positions and `active_connections`.
pub trait Scheduler: Send + Sync {
    /// Chooses a node for a requester at `user`. `None` only when there is no
    /// node to choose from.
    fn next_node(&self, user: Position) -> Option<Arc<Node>>;

    /// The nodes this scheduler routes across.
    fn nodes(&self) -> &[Arc<Node>];

    fn name(&self) -> &'static str;
}

/// Router selector used by configuration.
///
/// # Examples
///
/// ```
/// use edgesim_core::router::SchedulerKind;
///
/// let kind: SchedulerKind = "distance_round_robin".parse().unwrap();
/// assert_eq!(kind, SchedulerKind::DistanceAdaptive);
/// assert!("fastest".parse::<SchedulerKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SchedulerKind {
    #[default]
    DistanceAdaptive,
    Nearest,
    RoundRobin,
}

static SCHEDULER_TABLE: Lazy<HashMap<&'static str, SchedulerKind>> = Lazy::new(|| {
    HashMap::from([
        ("distance", SchedulerKind::DistanceAdaptive),
        ("distance_round_robin", SchedulerKind::DistanceAdaptive),
        ("adaptive", SchedulerKind::DistanceAdaptive),
        ("nearest", SchedulerKind::Nearest),
        ("round_robin", SchedulerKind::RoundRobin),
        ("rr", SchedulerKind::RoundRobin),
    ])
});

impl SchedulerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerKind::DistanceAdaptive => "distance",
            SchedulerKind::Nearest => "nearest",
            SchedulerKind::RoundRobin => "round_robin",
        }
    }
}

impl FromStr for SchedulerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SCHEDULER_TABLE
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| ConfigError::UnknownScheduler(s.to_string()))
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index and distance of the node closest to `user`. Ties keep the first node.
pub(crate) fn nearest_index(nodes: &[Arc<Node>], user: Position) -> Option<(usize, f64)> {
    nodes
        .iter()
        .map(|node| node.distance_to(user))
        .enumerate()
        .fold(None, |best, (idx, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((idx, dist)),
        })
}
