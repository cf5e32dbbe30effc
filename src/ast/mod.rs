//! The abstract syntax tree produced by the parser and consumed by the
//! transpiler. Nodes own their children exclusively, so dropping a
//! [`Program`] drops the whole tree; expressions keep the token that
//! introduced them for span reporting.

mod expression;
mod statement;

pub use expression::*;
pub use statement::*;

/// Root node: an ordered sequence of statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program<'a> {
    pub stmts: Vec<Stmt<'a>>,
}
