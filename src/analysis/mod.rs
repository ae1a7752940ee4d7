//! Whole-graph analysis over a `DependencyMap`: ancestor sets and cycle checks.
pub mod error;
pub mod topology;

pub use error::CircularDependency;
pub use topology::{build_reachability, check_circularity, Reachability};
