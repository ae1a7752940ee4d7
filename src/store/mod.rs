//! Plain data handed in by callers: node ids, context nodes and the
//! dependency map derived from them.
pub mod registry;
pub mod types;

pub use registry::{extract_ids, DependencyMap, Prerequisites};
pub use types::{ContextNode, NodeId};
