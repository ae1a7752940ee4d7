//! AST for prerequisite expressions.

use crate::store::NodeId;
use serde::{Serialize, Deserialize};
use std::collections::BTreeSet;
use std::fmt;

/// Boolean connective of an operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// Keyword used when serializing, e.g. `AND`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed prerequisite expression.
///
/// Operator nodes are n-ary: `1 AND 2 AND 3` is a single `Op` with three children.
/// After parsing every `Op` has at least two children; simplification may collapse
/// a node to a single child (returned directly) or to nothing (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Reference to another node.
    Id(NodeId),
    /// `AND`/`OR` over the children, in source order.
    Op(Operator, Vec<Expr>),
}

impl Expr {
    pub fn id(value: impl Into<NodeId>) -> Self { Expr::Id(value.into()) }
    pub fn and(children: Vec<Expr>) -> Self { Expr::Op(Operator::And, children) }
    pub fn or(children: Vec<Expr>) -> Self { Expr::Op(Operator::Or, children) }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expr::Id(_) => None,
            Expr::Op(op, _) => Some(*op),
        }
    }

    /// Every node id referenced under this subtree.
    pub fn ids(&self) -> BTreeSet<NodeId> {
        let mut ids = BTreeSet::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, out: &mut BTreeSet<NodeId>) {
        match self {
            Expr::Id(id) => {
                out.insert(*id);
            }
            Expr::Op(_, children) => {
                for child in children {
                    child.collect_ids(out);
                }
            }
        }
    }

    /// Applies `f` to every leaf, keeping the tree shape.
    pub fn map_ids<F>(self, f: &mut F) -> Expr
    where
        F: FnMut(NodeId) -> NodeId,
    {
        match self {
            Expr::Id(id) => Expr::Id(f(id)),
            Expr::Op(op, children) => {
                Expr::Op(op, children.into_iter().map(|c| c.map_ids(f)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_deduplicated_across_branches() {
        let expr = Expr::or(vec![
            Expr::and(vec![Expr::id(1), Expr::id(2)]),
            Expr::and(vec![Expr::id(2), Expr::id(3)]),
        ]);
        let ids: Vec<u64> = expr.ids().into_iter().map(|id| id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_map_ids_keeps_shape() {
        let expr = Expr::and(vec![Expr::id(1), Expr::or(vec![Expr::id(2), Expr::id(1)])]);
        let mapped = expr.map_ids(&mut |id| if id == NodeId(1) { NodeId(10) } else { id });
        assert_eq!(
            mapped,
            Expr::and(vec![Expr::id(10), Expr::or(vec![Expr::id(2), Expr::id(10)])])
        );
    }

    #[test]
    fn test_operator_keyword() {
        assert_eq!(Operator::And.to_string(), "AND");
        assert_eq!(Expr::or(vec![]).operator(), Some(Operator::Or));
        assert_eq!(Expr::id(4).operator(), None);
    }
}
