//! Request-level entry points used by the HTTP layer and batch tooling.

use crate::analysis::build_reachability;
use crate::expression::{self, simplify_expression, Clause};
use crate::store::{extract_ids, ContextNode, DependencyMap, NodeId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Body of a simplification request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyRequest {
    pub expression: String,
    /// The node whose expression is being edited; left out of the context.
    #[serde(default)]
    pub current_node_id: Option<NodeId>,
    #[serde(default)]
    pub context_nodes: Vec<ContextNode>,
}

impl SimplifyRequest {
    pub fn new(expression: &str, current_node_id: Option<NodeId>, context_nodes: Vec<ContextNode>) -> Self {
        Self { expression: expression.to_string(), current_node_id, context_nodes }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyResponse {
    pub simplified_expression: String,
    /// Ids present in the input but gone from the output, ascending.
    pub redundant_ids: Vec<NodeId>,
}

/// Simplifies the request's expression against the prerequisite graph formed by
/// its context nodes.
pub fn simplify_prerequisites(request: &SimplifyRequest) -> SimplifyResponse {
    simplify_in_context(&request.expression, request.current_node_id, &request.context_nodes)
}

/// Simplifies every node's expression, each with all other nodes as context.
///
/// Results come back in input order. Runs on the rayon pool when the `parallel`
/// feature is enabled.
pub fn simplify_graph(nodes: &[ContextNode]) -> Vec<(NodeId, SimplifyResponse)> {
    let simplify_node =
        |node: &ContextNode| (node.id, simplify_in_context(node.expression(), Some(node.id), nodes));

    #[cfg(feature = "parallel")]
    let results = nodes.par_iter().map(simplify_node).collect();
    #[cfg(not(feature = "parallel"))]
    let results = nodes.iter().map(simplify_node).collect();

    results
}

fn simplify_in_context(
    expression: &str,
    current: Option<NodeId>,
    context: &[ContextNode],
) -> SimplifyResponse {
    // 1. Dependency map without the node being edited
    let deps = DependencyMap::from_context(context, current);

    // 2. Transitive ancestors
    let reachability = build_reachability(&deps);

    // 3. Simplify and diff the id sets
    let simplified_expression = simplify_expression(expression, &reachability);
    let remaining: BTreeSet<NodeId> = extract_ids(&simplified_expression).into_iter().collect();
    let redundant: BTreeSet<NodeId> = extract_ids(expression)
        .into_iter()
        .filter(|id| !remaining.contains(id))
        .collect();

    if !redundant.is_empty() {
        debug!("Simplified {:?} to {:?}", expression, simplified_expression);
    }
    SimplifyResponse { simplified_expression, redundant_ids: redundant.into_iter().collect() }
}

/// Alternative prerequisite pathways of `expression`.
pub fn pathways(expression: &str) -> Vec<Clause> {
    expression::pathways(expression)
}
