//! Redundancy elimination over the prerequisite graph.
//!
//! Works bottom-up. Each operator node first simplifies its children, then splices
//! in children that use the same connective, then drops operands made unnecessary
//! by a sibling:
//!
//! - under `AND`, operand `i` is dropped when every id in `i` equals, or is an
//!   ancestor of, some id in a sibling `j` (satisfying `j` already requires `i`);
//! - under `OR`, operand `i` is dropped when every id in a sibling `j` equals, or
//!   is an ancestor of, some id in `i` (the weaker alternative `j` suffices).
//!
//! Operands are visited in order and compared only against siblings that have not
//! been dropped yet. A later sibling that is itself made redundant by `i` never
//! counts against `i`, so of two equivalent operands the earlier one survives.

use super::ast::{Expr, Operator};
use super::display::to_expression_string;
use super::parser::parse;
use crate::analysis::Reachability;
use crate::store::NodeId;
use log::debug;
use std::collections::BTreeSet;

/// Simplifies `expr` against `reachability`. `None` means no requirement remains.
pub fn simplify(expr: Expr, reachability: &Reachability) -> Option<Expr> {
    match expr {
        Expr::Id(_) => Some(expr),
        Expr::Op(op, children) => simplify_op(op, children, reachability),
    }
}

fn simplify_op(op: Operator, children: Vec<Expr>, reachability: &Reachability) -> Option<Expr> {
    let mut flattened = Vec::with_capacity(children.len());
    for child in children.into_iter().filter_map(|c| simplify(c, reachability)) {
        match child {
            Expr::Op(inner, grandchildren) if inner == op => flattened.extend(grandchildren),
            other => flattened.push(other),
        }
    }

    let ids: Vec<BTreeSet<NodeId>> = flattened.iter().map(Expr::ids).collect();
    let mut keep = vec![true; flattened.len()];

    for i in 0..flattened.len() {
        let redundant = (0..flattened.len()).any(|j| {
            j != i
                && keep[j]
                && makes_redundant(op, &ids[i], &ids[j], reachability)
                && !(j > i && makes_redundant(op, &ids[j], &ids[i], reachability))
        });
        if redundant {
            debug!("Dropping redundant {} operand {}", op, flattened[i]);
            keep[i] = false;
        }
    }

    if !keep.iter().any(|&k| k) {
        // Never erase content outright: fall back to the first operand.
        return flattened.into_iter().next();
    }

    let mut survivors: Vec<Expr> = flattened
        .into_iter()
        .zip(keep)
        .filter_map(|(child, k)| k.then_some(child))
        .collect();

    if survivors.len() == 1 {
        survivors.pop()
    } else {
        Some(Expr::Op(op, survivors))
    }
}

/// Whether operand `i` is made unnecessary by sibling `j` under `op`.
fn makes_redundant(
    op: Operator,
    ids_i: &BTreeSet<NodeId>,
    ids_j: &BTreeSet<NodeId>,
    reachability: &Reachability,
) -> bool {
    match op {
        Operator::And => ids_i
            .iter()
            .all(|&a| ids_j.iter().any(|&b| reachability.covers(b, a))),
        Operator::Or => ids_j
            .iter()
            .all(|&b| ids_i.iter().any(|&a| reachability.covers(a, b))),
    }
}

/// Parses, simplifies and re-serializes `expression`.
///
/// Empty or id-free input, and trees that simplify away, give `""`.
pub fn simplify_expression(expression: &str, reachability: &Reachability) -> String {
    let simplified = parse(expression).and_then(|tree| simplify(tree, reachability));
    to_expression_string(simplified.as_ref())
}
