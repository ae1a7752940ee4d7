//! Defines the error types for the analysis module.
use crate::store::NodeId;
use thiserror::Error;

/// A prerequisite chain that loops back on itself.
///
/// `path` starts and ends with the same node, e.g. `[1, 2, 1]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("circular prerequisite chain: {}", format_path(.path))]
pub struct CircularDependency {
    pub path: Vec<NodeId>,
}

impl CircularDependency {
    pub fn new(path: Vec<NodeId>) -> Self { Self { path } }

    /// The node where the loop closes.
    pub fn entry(&self) -> Option<NodeId> { self.path.first().copied() }
}

fn format_path(path: &[NodeId]) -> String {
    path.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_the_chain() {
        let err = CircularDependency::new(vec![NodeId(1), NodeId(2), NodeId(1)]);
        assert_eq!(err.to_string(), "circular prerequisite chain: 1 -> 2 -> 1");
        assert_eq!(err.entry(), Some(NodeId(1)));
    }
}
