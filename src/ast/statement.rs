use crate::lexer::Token;

use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    Let(LetStmt<'a>),
    If(IfStmt<'a>),
    Print(PrintStmt<'a>),
    Expr(ExprStmt<'a>),
}

/// `let <identifier> := <expr> .`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt<'a> {
    pub identifier: Token<'a>,
    pub value: Expr<'a>,
}

impl<'a> LetStmt<'a> {
    pub fn name(&self) -> &'a str {
        self.identifier.lexeme
    }
}

/// `if <expr> then <stmt>* (else <stmt>*)? end`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt<'a> {
    pub condition: Expr<'a>,
    pub then_branch: Vec<Stmt<'a>>,
    pub else_branch: Vec<Stmt<'a>>,
}

/// `print <expr>* .`
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt<'a> {
    pub exprs: Vec<Expr<'a>>,
}

/// An expression evaluated for effect, terminated by `.`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt<'a> {
    pub expr: Expr<'a>,
}
