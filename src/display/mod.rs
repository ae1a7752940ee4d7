//! State kept by the graph renderer on top of the pure expression functions.
pub mod pathway;

pub use pathway::PathwaySelection;
