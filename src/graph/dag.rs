//! dag.rs
//! Graph-wide queries over prerequisite relations, backed by petgraph.
//! Edges point from a prerequisite to the node that depends on it.

use crate::analysis::CircularDependency;
use crate::store::{DependencyMap, NodeId};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction::{Incoming, Outgoing};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    graph: DiGraphMap<NodeId, ()>,
}

impl PrerequisiteGraph {
    pub fn new() -> Self { Self::default() }

    /// Builds the graph from a dependency map. Ids only mentioned as prerequisites
    /// become nodes too. Nodes are added in ascending id order.
    pub fn from_dependencies(deps: &DependencyMap) -> Self {
        let mut ids: Vec<NodeId> = deps.ids().collect();
        ids.sort_unstable();

        let mut graph = DiGraphMap::with_capacity(ids.len(), ids.len());
        for &id in &ids {
            graph.add_node(id);
        }
        for &id in &ids {
            for &pre in deps.get_prerequisites(id) {
                graph.add_edge(pre, id, ());
            }
        }
        Self { graph }
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }
    pub fn edge_count(&self) -> usize { self.graph.edge_count() }
    pub fn contains(&self, id: NodeId) -> bool { self.graph.contains_node(id) }

    pub fn direct_prerequisites(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.neighbors_directed(id, Incoming).collect()
    }

    pub fn direct_dependents(&self, id: NodeId) -> Vec<NodeId> {
        self.graph.neighbors_directed(id, Outgoing).collect()
    }

    /// Every node that transitively depends on one of `start_nodes`, seeds included.
    pub fn dependents_of(&self, start_nodes: &[NodeId]) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from(start_nodes.to_vec());

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) {
                queue.extend(self.graph.neighbors_directed(node, Outgoing));
            }
        }
        visited
    }

    /// Orders nodes so every prerequisite comes before its dependents.
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CircularDependency> {
        toposort(&self.graph, None).map_err(|cycle| {
            let node = cycle.node_id();
            CircularDependency::new(self.cycle_from(node).unwrap_or_else(|| vec![node, node]))
        })
    }

    /// Finds a loop reachable from `start`, listed in "depends on" order.
    fn cycle_from(&self, start: NodeId) -> Option<Vec<NodeId>> {
        let mut on_stack: HashMap<NodeId, bool> = HashMap::new();
        let mut stack = Vec::new();
        let mut path = self.walk(start, &mut on_stack, &mut stack)?;
        // The walk follows edges prerequisite -> dependent.
        path.reverse();
        Some(path)
    }

    fn walk(
        &self,
        node: NodeId,
        on_stack: &mut HashMap<NodeId, bool>,
        stack: &mut Vec<NodeId>,
    ) -> Option<Vec<NodeId>> {
        match on_stack.get(&node) {
            Some(true) => {
                let from = stack.iter().position(|&n| n == node).unwrap_or(0);
                let mut path = stack.split_off(from);
                path.push(node);
                return Some(path);
            }
            Some(false) => return None,
            None => {}
        }

        on_stack.insert(node, true);
        stack.push(node);
        for next in self.graph.neighbors_directed(node, Outgoing) {
            if let Some(path) = self.walk(next, on_stack, stack) {
                return Some(path);
            }
        }
        stack.pop();
        on_stack.insert(node, false);
        None
    }
}
