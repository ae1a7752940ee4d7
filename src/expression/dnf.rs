//! Disjunctive normal form: the alternative prerequisite pathways of an expression.
//!
//! Each [`Clause`] is one AND-combination of ids that satisfies the expression; the
//! returned list is the OR of its clauses. Nothing is deduplicated or minimized here,
//! so every id of the source expression shows up in at least one clause.

use super::ast::{Expr, Operator};
use super::parser::parse;
use crate::store::NodeId;
use smallvec::{smallvec, SmallVec};

/// One pathway: ids that must all be satisfied together.
pub type Clause = SmallVec<[NodeId; 4]>;

/// Expands `expr` into its clauses. An absent expression has none.
pub fn to_dnf(expr: Option<&Expr>) -> Vec<Clause> {
    expr.map(expand).unwrap_or_default()
}

/// Parses `expression` and expands it. See [`to_dnf`].
pub fn pathways(expression: &str) -> Vec<Clause> {
    to_dnf(parse(expression).as_ref())
}

fn expand(expr: &Expr) -> Vec<Clause> {
    match expr {
        Expr::Id(id) => vec![smallvec![*id]],
        Expr::Op(Operator::Or, children) => children.iter().flat_map(expand).collect(),
        Expr::Op(Operator::And, children) => children
            .iter()
            .map(expand)
            .fold(Vec::new(), cartesian_product),
    }
}

/// Pairs every left clause with every right clause. An empty side means
/// "no constraint" and leaves the other side unchanged.
fn cartesian_product(left: Vec<Clause>, right: Vec<Clause>) -> Vec<Clause> {
    if left.is_empty() {
        return right;
    }
    if right.is_empty() {
        return left;
    }
    let mut out = Vec::with_capacity(left.len() * right.len());
    for l in &left {
        for r in &right {
            out.push(l.iter().chain(r.iter()).copied().collect());
        }
    }
    out
}
