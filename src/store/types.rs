use serde::{Serialize, Deserialize};
use std::fmt;

/// Identifier of a node (a learning concept) inside one graph snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    #[inline(always)]
    pub fn value(&self) -> u64 { self.0 }
    pub fn new(value: u64) -> Self { Self(value) }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self { Self(value) }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sibling node supplied by the caller as context for simplification.
///
/// Field names follow the JSON body of the surrounding API (`local_id`, `prerequisite`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextNode {
    #[serde(rename = "local_id")]
    pub id: NodeId,
    #[serde(default)]
    pub prerequisite: Option<String>,
}

impl ContextNode {
    pub fn new(id: impl Into<NodeId>, prerequisite: &str) -> Self {
        Self { id: id.into(), prerequisite: Some(prerequisite.to_string()) }
    }

    pub fn expression(&self) -> &str {
        self.prerequisite.as_deref().unwrap_or("")
    }
}
