use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A half-open byte interval `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Str,
    Char,
    Identifier,
    Plus,
    Minus,
    Star,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Dot,
    Walrus,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Char => "character",
            TokenKind::Identifier => "identifier",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Dot => ".",
            TokenKind::Walrus => ":=",
            TokenKind::Lt => "<",
            TokenKind::Lte => "<=",
            TokenKind::Gt => ">",
            TokenKind::Gte => ">=",
            TokenKind::Eq => "=",
            TokenKind::End => "EOF",
        })
    }
}

/// A single lexed token. The lexeme borrows from the source string, so tokens
/// stay valid for as long as the source they were lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Span,
}
