use std::sync::Arc;

use parking_lot::Mutex;

use super::Scheduler;
use crate::{ConfigError, Node, Position};

/// Cycles through the nodes in a fixed order, ignoring the requester position.
pub struct RoundRobinScheduler {
    nodes: Vec<Arc<Node>>,
    cursor: Mutex<usize>,
}

impl RoundRobinScheduler {
    pub fn new(nodes: Vec<Arc<Node>>) -> Result<Self, ConfigError> {
        if nodes.is_empty() {
            return Err(ConfigError::EmptyNodeList);
        }
        Ok(Self {
            nodes,
            cursor: Mutex::new(0),
        })
    }
}

impl Scheduler for RoundRobinScheduler {
    fn next_node(&self, _user: Position) -> Option<Arc<Node>> {
        let mut cursor = self.cursor.lock();
        let node = self.nodes.get(*cursor)?;
        *cursor = (*cursor + 1) % self.nodes.len();
        Some(Arc::clone(node))
    }

    fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::node_at;
    use super::*;

    #[test]
    fn test_cycles_in_order() {
        let nodes = vec![node_at(0, 0.0, 0.0), node_at(1, 1.0, 0.0), node_at(2, 2.0, 0.0)];
        let router = RoundRobinScheduler::new(nodes).unwrap();
        let ids: Vec<usize> = (0..7)
            .map(|i| router.next_node(Position::new(i as f64, 0.0)).unwrap().id())
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_single_node() {
        let router = RoundRobinScheduler::new(vec![node_at(7, 0.0, 0.0)]).unwrap();
        for _ in 0..3 {
            assert_eq!(router.next_node(Position::ORIGIN).unwrap().id(), 7);
        }
    }
}
