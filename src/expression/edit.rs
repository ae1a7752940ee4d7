//! Structural edits used when a node is deleted or renumbered.

use super::ast::Expr;
use super::display::to_expression_string;
use super::parser::parse;
use super::simplify::simplify;
use crate::analysis::Reachability;
use crate::store::NodeId;
use regex::Regex;

/// Removes every reference to `id` and tidies what is left.
///
/// Operator nodes that lose all operands disappear, single survivors are unwrapped,
/// and the result goes through [`simplify`] with no graph knowledge, which only
/// flattens and drops exact duplicates. Text without any id is returned unchanged.
pub fn remove_id(expression: &str, id: NodeId) -> String {
    if expression.trim().is_empty() {
        return String::new();
    }
    let Some(tree) = parse(expression) else {
        return expression.to_string();
    };
    let pruned = prune(tree, id).and_then(|tree| simplify(tree, &Reachability::new()));
    to_expression_string(pruned.as_ref())
}

fn prune(expr: Expr, id: NodeId) -> Option<Expr> {
    match expr {
        Expr::Id(leaf) if leaf == id => None,
        Expr::Id(_) => Some(expr),
        Expr::Op(op, children) => {
            let mut kept: Vec<Expr> = children.into_iter().filter_map(|c| prune(c, id)).collect();
            match kept.len() {
                0 => None,
                1 => kept.pop(),
                _ => Some(Expr::Op(op, kept)),
            }
        }
    }
}

/// Replaces every reference to `old` with `new`, keeping the expression's structure.
///
/// The result is re-serialized but not simplified. Text the parser cannot read is
/// patched in place, whole-word occurrences only.
pub fn rename_id(expression: &str, old: NodeId, new: NodeId) -> String {
    if expression.trim().is_empty() {
        return String::new();
    }
    match parse(expression) {
        Some(tree) => tree
            .map_ids(&mut |id| if id == old { new } else { id })
            .to_string(),
        None => rename_in_text(expression, old, new),
    }
}

fn rename_in_text(expression: &str, old: NodeId, new: NodeId) -> String {
    match Regex::new(&format!(r"\b{}\b", old)) {
        Ok(word) => word.replace_all(expression, new.to_string().as_str()).into_owned(),
        Err(_) => expression.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1 AND 2", 1, "2")]
    #[case("1 OR 2", 1, "2")]
    #[case("1", 1, "")]
    #[case("(1 OR 2) AND 3", 2, "1 AND 3")]
    #[case("(1 AND 2) OR (1 AND 3)", 1, "2 OR 3")]
    #[case("(4 OR 5) AND (4 OR 5)", 6, "4 OR 5")]
    #[case("1 AND (2 AND 3)", 9, "1 AND 2 AND 3")]
    #[case("", 1, "")]
    #[case("see notes", 1, "see notes")]
    fn test_remove_id(#[case] input: &str, #[case] id: u64, #[case] expected: &str) {
        assert_eq!(remove_id(input, NodeId(id)), expected);
    }

    #[rstest]
    #[case("1 AND 2", 1, 10, "10 AND 2")]
    #[case("(1 OR 2) AND 1", 1, 7, "(7 OR 2) AND 7")]
    #[case("11 AND 1", 1, 3, "11 AND 3")]
    #[case("2, 3", 4, 5, "2 AND 3")]
    #[case("", 1, 2, "")]
    fn test_rename_id(
        #[case] input: &str,
        #[case] old: u64,
        #[case] new: u64,
        #[case] expected: &str,
    ) {
        assert_eq!(rename_id(input, NodeId(old), NodeId(new)), expected);
    }

    #[test]
    fn test_rename_does_not_simplify() {
        assert_eq!(rename_id("1 AND 1", NodeId(1), NodeId(2)), "2 AND 2");
    }

    #[test]
    fn test_rename_in_text_matches_whole_words() {
        assert_eq!(rename_in_text("1 and 11", NodeId(1), NodeId(4)), "4 and 11");
    }
}
