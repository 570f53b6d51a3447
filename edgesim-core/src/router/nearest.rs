use std::sync::Arc;

use super::Scheduler;
use crate::{ConfigError, Node, Position};

/// Routes every request to the geographically nearest node.
///
/// Nodes at exactly the same distance are separated by load: a later node only
/// replaces the current pick if it has strictly fewer `active_connections`, so
/// among equally loaded twins the first in list order wins.
pub struct NearestNodeScheduler {
    nodes: Vec<Arc<Node>>,
}

impl NearestNodeScheduler {
    pub fn new(nodes: Vec<Arc<Node>>) -> Result<Self, ConfigError> {
        if nodes.is_empty() {
            return Err(ConfigError::EmptyNodeList);
        }
        Ok(Self { nodes })
    }
}

impl Scheduler for NearestNodeScheduler {
    fn next_node(&self, user: Position) -> Option<Arc<Node>> {
        let mut best: Option<(&Arc<Node>, f64)> = None;
        for node in &self.nodes {
            let distance = node.distance_to(user);
            best = match best {
                None => Some((node, distance)),
                Some((_, shortest)) if distance < shortest => Some((node, distance)),
                Some((current, shortest))
                    if distance == shortest
                        && node.active_connections() < current.active_connections() =>
                {
                    Some((node, shortest))
                }
                keep => keep,
            };
        }
        best.map(|(node, _)| Arc::clone(node))
    }

    fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}
