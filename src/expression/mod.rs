//! Prerequisite expressions: parsing, serialization, simplification and
//! pathway expansion.
pub mod ast;
pub mod display;
pub mod dnf;
pub mod edit;
pub mod parser;
pub mod simplify;

pub use ast::{Expr, Operator};
pub use display::to_expression_string;
pub use dnf::{pathways, to_dnf, Clause};
pub use edit::{remove_id, rename_id};
pub use parser::parse;
pub use simplify::{simplify, simplify_expression};
