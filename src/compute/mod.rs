//! Request/response layer over the expression engine.
pub mod engine;

pub use engine::{pathways, simplify_graph, simplify_prerequisites, SimplifyRequest, SimplifyResponse};
