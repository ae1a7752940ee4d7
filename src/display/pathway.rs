//! Active-pathway bookkeeping for one rendered node.
//!
//! A node's prerequisite expression expands into alternative pathways (see
//! [`crate::expression::dnf`]). The renderer highlights the edges of one of them;
//! clicking an incoming edge cycles through the pathways that use that edge.

use crate::expression::{pathways, Clause};
use crate::store::NodeId;
use log::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathwaySelection {
    pathways: Vec<Clause>,
    active: usize,
}

impl PathwaySelection {
    pub fn new(pathways: Vec<Clause>) -> Self { Self { pathways, active: 0 } }

    /// Selection over the pathways of `expression`.
    pub fn from_expression(expression: &str) -> Self { Self::new(pathways(expression)) }

    #[inline(always)]
    pub fn active_index(&self) -> usize { self.active }
    pub fn pathways(&self) -> &[Clause] { &self.pathways }
    pub fn active_clause(&self) -> Option<&Clause> { self.pathways.get(self.active) }

    /// Replaces the pathways, e.g. after the expression was edited.
    /// The active index is clamped into the new range.
    pub fn set_pathways(&mut self, pathways: Vec<Clause>) {
        self.pathways = pathways;
        self.active = self.active.min(self.pathways.len().saturating_sub(1));
    }

    /// Whether the edge `source -> this node` belongs to the active pathway.
    pub fn edge_is_active(&self, source: NodeId) -> bool {
        self.active_clause().is_some_and(|clause| clause.contains(&source))
    }

    /// Reacts to a click on the edge coming from `source` and returns the new index.
    ///
    /// If the active pathway does not use `source`, the first pathway that does
    /// becomes active. Otherwise the next pathway using `source` is chosen, wrapping
    /// around. Nothing changes when no other pathway qualifies.
    pub fn select_edge(&mut self, source: NodeId) -> usize {
        let count = self.pathways.len();
        let uses_source = |i: usize| self.pathways[i].contains(&source);

        let next = if self.edge_is_active(source) {
            (1..count).map(|step| (self.active + step) % count).find(|&i| uses_source(i))
        } else {
            (0..count).find(|&i| uses_source(i))
        };

        if let Some(index) = next {
            trace!("Edge from {} switches pathway {} -> {}", source, self.active, index);
            self.active = index;
        }
        self.active
    }
}
