use super::error::CircularDependency;
use crate::store::{DependencyMap, NodeId};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Transitive ancestor sets: for each node, every prerequisite of its prerequisites.
///
/// A node never appears in its own set unless the input contains a cycle through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    ancestors: HashMap<NodeId, HashSet<NodeId>>,
}

impl Reachability {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.ancestors.len() }
    pub fn is_empty(&self) -> bool { self.ancestors.is_empty() }

    /// All known ancestors of `id`, or `None` for ids the builder never saw.
    pub fn ancestors(&self, id: NodeId) -> Option<&HashSet<NodeId>> {
        self.ancestors.get(&id)
    }

    /// Returns true if `ancestor` is reachable by following prerequisites from `id`.
    #[inline(always)]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors.get(&id).is_some_and(|set| set.contains(&ancestor))
    }

    /// Returns true if `id` equals `by` or is one of its ancestors.
    #[inline(always)]
    pub fn covers(&self, by: NodeId, id: NodeId) -> bool {
        id == by || self.is_ancestor(id, by)
    }

    pub fn insert(&mut self, id: NodeId, ancestors: impl IntoIterator<Item = NodeId>) {
        self.ancestors.insert(id, ancestors.into_iter().collect());
    }
}

impl<I> FromIterator<(NodeId, I)> for Reachability
where
    I: IntoIterator<Item = NodeId>,
{
    fn from_iter<T: IntoIterator<Item = (NodeId, I)>>(iter: T) -> Self {
        let mut reachability = Self::new();
        for (id, ancestors) in iter {
            reachability.insert(id, ancestors);
        }
        reachability
    }
}

/// Computes the ancestor set of every node in `deps`.
///
/// Depth-first and memoized: a finished entry is reused by every later query.
/// Revisiting a node that is still on the current path contributes nothing, which
/// breaks cycles without reporting them. Roots are visited in ascending id order so
/// the partial sets produced around a cycle do not depend on hash order.
pub fn build_reachability(deps: &DependencyMap) -> Reachability {
    let mut memo = HashMap::with_capacity(deps.len());
    let mut visiting = HashSet::new();

    let mut roots: Vec<NodeId> = deps.ids().collect();
    roots.sort_unstable();

    for id in roots {
        collect_ancestors(id, deps, &mut memo, &mut visiting);
    }

    Reachability { ancestors: memo }
}

fn collect_ancestors(
    id: NodeId,
    deps: &DependencyMap,
    memo: &mut HashMap<NodeId, HashSet<NodeId>>,
    visiting: &mut HashSet<NodeId>,
) {
    if memo.contains_key(&id) {
        return;
    }
    if !visiting.insert(id) {
        debug!("Prerequisite cycle through node {}; ignoring back edge", id);
        return;
    }

    let mut ancestors = HashSet::new();
    for &pre in deps.get_prerequisites(id) {
        ancestors.insert(pre);
        collect_ancestors(pre, deps, memo, visiting);
        // Absent when `pre` is still on the path (cycle).
        if let Some(inherited) = memo.get(&pre) {
            ancestors.extend(inherited.iter().copied());
        }
    }

    visiting.remove(&id);
    trace!("Node {} has {} ancestors", id, ancestors.len());
    memo.insert(id, ancestors);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Checks whether giving `start` the prerequisites `new_prerequisites` would close a loop.
///
/// `deps` is left untouched; the replacement only exists for the duration of the search.
/// Only cycles reachable from `start` are reported.
pub fn check_circularity(
    deps: &DependencyMap,
    start: NodeId,
    new_prerequisites: &[NodeId],
) -> Result<(), CircularDependency> {
    let mut search = CycleSearch {
        deps,
        start,
        replacement: new_prerequisites,
        state: HashMap::new(),
        stack: Vec::new(),
    };
    match search.visit(start) {
        Some(path) => Err(CircularDependency::new(path)),
        None => Ok(()),
    }
}

struct CycleSearch<'a> {
    deps: &'a DependencyMap,
    start: NodeId,
    replacement: &'a [NodeId],
    state: HashMap<NodeId, VisitState>,
    stack: Vec<NodeId>,
}

impl<'a> CycleSearch<'a> {
    fn prerequisites(&self, node: NodeId) -> &'a [NodeId] {
        if node == self.start { self.replacement } else { self.deps.get_prerequisites(node) }
    }

    fn visit(&mut self, node: NodeId) -> Option<Vec<NodeId>> {
        match self.state.get(&node) {
            Some(VisitState::Visited) => return None,
            Some(VisitState::Visiting) => {
                let from = self.stack.iter().position(|&n| n == node).unwrap_or(0);
                let mut path = self.stack.split_off(from);
                path.push(node);
                return Some(path);
            }
            None => {}
        }

        self.state.insert(node, VisitState::Visiting);
        self.stack.push(node);

        for &next in self.prerequisites(node) {
            if let Some(path) = self.visit(next) {
                return Some(path);
            }
        }

        self.stack.pop();
        self.state.insert(node, VisitState::Visited);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[u64]) -> HashSet<NodeId> {
        values.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn test_chain_ancestors() {
        let deps = DependencyMap::from_pairs(&[(1, &[]), (2, &[1]), (3, &[2])]);
        let reach = build_reachability(&deps);

        assert_eq!(reach.ancestors(NodeId(3)), Some(&set(&[1, 2])));
        assert_eq!(reach.ancestors(NodeId(2)), Some(&set(&[1])));
        assert_eq!(reach.ancestors(NodeId(1)), Some(&set(&[])));
        assert!(reach.is_ancestor(NodeId(1), NodeId(3)));
        assert!(!reach.is_ancestor(NodeId(3), NodeId(1)));
    }

    #[test]
    fn test_diamond_dependency() {
        // 4 needs 2 and 3, both of which need 1.
        let deps = DependencyMap::from_pairs(&[
            (1, &[]),
            (2, &[1]),
            (3, &[1]),
            (4, &[2, 3]),
        ]);
        let reach = build_reachability(&deps);
        assert_eq!(reach.ancestors(NodeId(4)), Some(&set(&[1, 2, 3])));
    }

    #[test]
    fn test_unknown_prerequisite_has_no_ancestors() {
        let deps = DependencyMap::from_pairs(&[(2, &[7])]);
        let reach = build_reachability(&deps);
        assert_eq!(reach.ancestors(NodeId(2)), Some(&set(&[7])));
        assert_eq!(reach.ancestors(NodeId(7)), Some(&set(&[])));
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        let deps = DependencyMap::from_pairs(&[(1, &[2]), (2, &[1])]);
        let reach = build_reachability(&deps);

        // Node 1 is the first root, so 2 sees the back edge to 1 as empty.
        assert_eq!(reach.ancestors(NodeId(2)), Some(&set(&[1])));
        assert_eq!(reach.ancestors(NodeId(1)), Some(&set(&[1, 2])));
    }

    #[test]
    fn test_self_loop_terminates() {
        let deps = DependencyMap::from_pairs(&[(1, &[1])]);
        let reach = build_reachability(&deps);
        assert_eq!(reach.ancestors(NodeId(1)), Some(&set(&[1])));
    }

    #[test]
    fn test_result_is_stable_across_builds() {
        let deps = DependencyMap::from_pairs(&[
            (5, &[4]),
            (4, &[3, 5]),
            (3, &[1, 2]),
            (2, &[1]),
        ]);
        let first = build_reachability(&deps);
        for _ in 0..5 {
            assert_eq!(build_reachability(&deps.clone()), first);
        }
    }

    #[test]
    fn test_check_circularity_accepts_dag() {
        let deps = DependencyMap::from_pairs(&[(1, &[]), (2, &[1])]);
        assert!(check_circularity(&deps, NodeId(3), &[NodeId(2), NodeId(1)]).is_ok());
    }

    #[test]
    fn test_check_circularity_reports_path() {
        let deps = DependencyMap::from_pairs(&[(1, &[]), (2, &[1]), (3, &[2])]);
        let err = check_circularity(&deps, NodeId(1), &[NodeId(3)]).unwrap_err();
        assert_eq!(err.path, vec![NodeId(1), NodeId(3), NodeId(2), NodeId(1)]);
    }

    #[test]
    fn test_check_circularity_self_reference() {
        let deps = DependencyMap::new();
        let err = check_circularity(&deps, NodeId(9), &[NodeId(9)]).unwrap_err();
        assert_eq!(err.path, vec![NodeId(9), NodeId(9)]);
    }

    #[test]
    fn test_check_circularity_does_not_mutate_input() {
        let deps = DependencyMap::from_pairs(&[(1, &[]), (2, &[1])]);
        let before = deps.clone();
        let _ = check_circularity(&deps, NodeId(1), &[NodeId(2)]);
        assert_eq!(deps, before);
    }
}
