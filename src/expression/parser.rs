//! Best-effort parser for free-text prerequisite expressions.
//!
//! Grammar (keywords case-insensitive, whitespace ignored):
//!
//! ```text
//! OrExpr  := AndExpr ( "OR" AndExpr )*
//! AndExpr := Primary ( ("AND" | ",")? Primary )*
//! Primary := "(" OrExpr ")" | Integer
//! ```
//!
//! The text is typed by end users, so nothing here fails: unknown characters are
//! dropped by the tokenizer, unmatched `)` are discarded, parentheses nested deeper
//! than [`MAX_DEPTH`] are discarded in pairs, stray tokens in operand
//! position are skipped, a missing `)` is implied at end of input, and two operands
//! with no operator between them are read as an `AND`.

use super::ast::{Expr, Operator};
use crate::store::NodeId;
use log::trace;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(|\)|AND|OR|,|[0-9]+").expect("hardcoded regex pattern is valid")
});

/// Parenthesis pairs nested beyond this depth are dropped, bounding recursion.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    Comma,
    Id(NodeId),
}

/// Parses `expression` into an AST, or `None` when it holds no node id at all.
pub fn parse(expression: &str) -> Option<Expr> {
    let tokens = tokenize(expression);
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or();
    if parser.pos < parser.tokens.len() {
        trace!("Ignoring {} trailing tokens", parser.tokens.len() - parser.pos);
    }
    expr
}

impl Expr {
    /// See [`parse`].
    pub fn parse(expression: &str) -> Option<Expr> {
        parse(expression)
    }
}

fn tokenize(expression: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut open = 0usize;

    for m in TOKEN_REGEX.find_iter(expression) {
        let text = m.as_str();
        let token = match text {
            "(" => {
                open += 1;
                if open > MAX_DEPTH {
                    continue;
                }
                Token::Open
            }
            ")" => {
                if open == 0 {
                    continue;
                }
                open -= 1;
                // Matches a dropped over-deep `(`.
                if open >= MAX_DEPTH {
                    continue;
                }
                Token::Close
            }
            "," => Token::Comma,
            _ if text.eq_ignore_ascii_case("and") => Token::And,
            _ if text.eq_ignore_ascii_case("or") => Token::Or,
            // Digit runs too long for a NodeId are dropped like any other noise.
            _ => match text.parse::<u64>() {
                Ok(value) => Token::Id(NodeId(value)),
                Err(_) => continue,
            },
        };
        tokens.push(token);
    }

    trace!("Tokenized {:?} into {:?}", expression, tokens);
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn parse_or(&mut self) -> Option<Expr> {
        let mut node = self.parse_and();
        while self.peek() == Some(Token::Or) {
            self.pos += 1;
            let right = self.parse_and();
            node = join(Operator::Or, node, right);
        }
        node
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut node = self.parse_primary();
        loop {
            match self.peek() {
                Some(Token::And) | Some(Token::Comma) => self.pos += 1,
                // Juxtaposed operands, e.g. `1 2` or `1 (2 OR 3)`.
                Some(Token::Id(_)) | Some(Token::Open) => {}
                _ => break,
            }
            let right = self.parse_primary();
            node = join(Operator::And, node, right);
        }
        node
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        loop {
            match self.peek()? {
                Token::Id(id) => {
                    self.pos += 1;
                    return Some(Expr::Id(id));
                }
                Token::Open => {
                    self.pos += 1;
                    let node = self.parse_or();
                    if self.peek() == Some(Token::Close) {
                        self.pos += 1;
                    }
                    return node;
                }
                // Closes the enclosing group; unmatched ones never reach the parser.
                Token::Close => return None,
                // Operator where an operand belongs: skip it.
                _ => self.pos += 1,
            }
        }
    }
}

/// Combines two optional operands, appending to `left` when it already uses `op`.
fn join(op: Operator, left: Option<Expr>, right: Option<Expr>) -> Option<Expr> {
    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (Some(Expr::Op(left_op, mut children)), Some(right)) if left_op == op => {
            children.push(right);
            Some(Expr::Op(op, children))
        }
        (Some(left), Some(right)) => Some(Expr::Op(op, vec![left, right])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(value: u64) -> Expr { Expr::id(value) }

    #[test]
    fn test_same_operator_chain_is_one_node() {
        assert_eq!(parse("1 AND 2 AND 3"), Some(Expr::and(vec![id(1), id(2), id(3)])));
        assert_eq!(parse("1 or 2 Or 3"), Some(Expr::or(vec![id(1), id(2), id(3)])));
    }

    #[test]
    fn test_comma_is_and() {
        assert_eq!(parse("1, 2 AND 3"), Some(Expr::and(vec![id(1), id(2), id(3)])));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            parse("1 AND 2 OR 3"),
            Some(Expr::or(vec![Expr::and(vec![id(1), id(2)]), id(3)]))
        );
        assert_eq!(
            parse("1 OR 2 AND 3"),
            Some(Expr::or(vec![id(1), Expr::and(vec![id(2), id(3)])]))
        );
    }

    #[test]
    fn test_parentheses_group() {
        assert_eq!(
            parse("(1 OR 2) AND 3"),
            Some(Expr::and(vec![Expr::or(vec![id(1), id(2)]), id(3)]))
        );
    }

    #[test]
    fn test_left_group_with_same_operator_absorbs_chain() {
        assert_eq!(parse("(1 AND 2) AND 3"), Some(Expr::and(vec![id(1), id(2), id(3)])));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("AND OR ,")]
    #[case("()")]
    #[case("no ids here")]
    fn test_returns_none_without_ids(#[case] input: &str) {
        assert_eq!(parse(input), None);
    }

    #[rstest]
    #[case("1 AND", "1")]
    #[case("AND 1", "1")]
    #[case("1 OR OR 2", "1 OR 2")]
    #[case("1) AND 2", "1 AND 2")]
    #[case("(1 OR 2", "1 OR 2")]
    #[case("((1 AND 2)", "1 AND 2")]
    #[case("1 & 2", "1 AND 2")]
    #[case("#1 and #2 or #3", "(1 AND 2) OR 3")]
    #[case("1 (2 OR 3)", "1 AND (2 OR 3)")]
    #[case("(1 AND ) OR 2", "1 OR 2")]
    #[case("99999999999999999999999 AND 4", "4")]
    fn test_malformed_input_is_tolerated(#[case] input: &str, #[case] expected: &str) {
        let parsed = parse(input).unwrap();
        assert_eq!(parsed.to_string(), expected);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let input = format!("{}7{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(parse(&input), Some(id(7)));
    }

    #[rstest]
    #[case(MAX_DEPTH)]
    #[case(MAX_DEPTH + 1)]
    #[case(10_000)]
    fn test_over_deep_group_keeps_following_operands(#[case] depth: usize) {
        let input = format!("{}7{} AND 8", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse(&input), Some(Expr::and(vec![id(7), id(8)])));
    }

    #[test]
    fn test_over_deep_parentheses_are_dropped_in_pairs() {
        let input = format!("{}1 OR 2) AND 3{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH));
        // The innermost pair is gone, so its contents merge into the enclosing group.
        assert_eq!(parse(&input).map(|e| e.to_string()).as_deref(), Some("1 OR (2 AND 3)"));
    }
}
