//! Core of the knowledge-graph editor's prerequisite handling.
//!
//! Every node of a knowledge graph carries a free-text prerequisite expression over
//! other node ids, e.g. `"(12 AND 14) OR 20"`. This crate parses those expressions,
//! removes operands already implied by the rest of the graph, expands expressions
//! into alternative pathways for rendering, and tracks which pathway is shown.
//!
//! All entry points are pure functions over caller-supplied snapshots. Malformed
//! expressions degrade to the empty expression instead of producing errors.

pub mod analysis;
pub mod compute;
pub mod display;
pub mod expression;
pub mod graph;
pub mod store;

pub use analysis::{build_reachability, check_circularity, CircularDependency, Reachability};
pub use compute::{pathways, simplify_graph, simplify_prerequisites, SimplifyRequest, SimplifyResponse};
pub use display::PathwaySelection;
pub use expression::{parse, remove_id, rename_id, simplify, simplify_expression, to_dnf, Clause, Expr, Operator};
pub use graph::PrerequisiteGraph;
pub use store::{extract_ids, ContextNode, DependencyMap, NodeId};
