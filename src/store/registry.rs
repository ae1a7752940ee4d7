use super::types::*;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::LazyLock;

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("hardcoded regex pattern is valid"));

/// Direct prerequisites of a single node. Most nodes have a handful.
pub type Prerequisites = SmallVec<[NodeId; 4]>;

/// Extracts every integer id from a prerequisite expression, in order of appearance.
///
/// This is a naive scan: operators are not interpreted, so `1 OR 2` and `1 AND 2`
/// both yield `[1, 2]`. Digit runs glued to letters (`a12`) are not ids, and runs
/// that overflow a `NodeId` are skipped.
pub fn extract_ids(expression: &str) -> Vec<NodeId> {
    ID_REGEX
        .find_iter(expression)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .map(NodeId)
        .collect()
}

/// Maps every node to the ids its expression mentions (its direct prerequisites).
///
/// Built fresh per call from the caller's working set of nodes and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    prerequisites: HashMap<NodeId, Prerequisites>,
}

impl DependencyMap {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.prerequisites.len() }
    pub fn is_empty(&self) -> bool { self.prerequisites.is_empty() }

    /// Builds the map from context nodes, leaving out `exclude` (the node being edited).
    ///
    /// A later entry with the same id replaces an earlier one.
    pub fn from_context(nodes: &[ContextNode], exclude: Option<NodeId>) -> Self {
        let mut map = Self::new();
        for node in nodes {
            if exclude == Some(node.id) {
                continue;
            }
            map.insert(node.id, extract_ids(node.expression()));
        }
        map
    }

    pub fn insert(&mut self, id: NodeId, prerequisites: impl IntoIterator<Item = NodeId>) {
        self.prerequisites.insert(id, prerequisites.into_iter().collect());
    }

    pub fn contains(&self, id: NodeId) -> bool { self.prerequisites.contains_key(&id) }

    /// Direct prerequisites of `id`. Unknown ids have none.
    #[inline(always)]
    pub fn get_prerequisites(&self, id: NodeId) -> &[NodeId] {
        self.prerequisites.get(&id).map(|p| p.as_slice()).unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.prerequisites.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[NodeId])> + '_ {
        self.prerequisites.iter().map(|(&id, p)| (id, p.as_slice()))
    }
}

impl<I> FromIterator<(NodeId, I)> for DependencyMap
where
    I: IntoIterator<Item = NodeId>,
{
    fn from_iter<T: IntoIterator<Item = (NodeId, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (id, prerequisites) in iter {
            map.insert(id, prerequisites);
        }
        map
    }
}

#[cfg(test)]
impl DependencyMap {
    /// Builds a map from literal `(id, prerequisites)` pairs.
    pub(crate) fn from_pairs(entries: &[(u64, &[u64])]) -> Self {
        entries
            .iter()
            .map(|&(id, pre)| (NodeId(id), pre.iter().copied().map(NodeId)))
            .collect()
    }
}
