//! Serialization of expressions back to text.
//!
//! Parentheses are minimal rather than round-trip exact: a child is wrapped only
//! when it is an operator node whose connective differs from its parent's.

use super::ast::Expr;
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Id(id) => write!(f, "{}", id),
            Expr::Op(op, children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op)?;
                    }
                    match child {
                        Expr::Op(inner, _) if inner != op => write!(f, "({})", child)?,
                        _ => write!(f, "{}", child)?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Text for an optional tree; an absent tree is the empty expression.
pub fn to_expression_string(expr: Option<&Expr>) -> String {
    expr.map(Expr::to_string).unwrap_or_default()
}
