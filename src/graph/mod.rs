//! Graph view of the prerequisite relation for whole-graph queries.
pub mod dag;

pub use dag::PrerequisiteGraph;
