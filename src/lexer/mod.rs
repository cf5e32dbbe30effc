//! Lexer for the Cat language.
//!
//! A single forward pass over the source bytes with one character of
//! lookahead. The lexer never fails: anything it cannot make sense of becomes
//! an error diagnostic and scanning continues with the next character, so the
//! parser always receives a token stream terminated by [`TokenKind::End`].

mod token;

pub use token::*;

use crate::diagnostic::Diagnostic;

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            tokens: vec![],
        }
    }

    pub fn lex(mut self, diagnostics: &mut Vec<Diagnostic>) -> Vec<Token<'a>> {
        while let Some(c) = self.peek() {
            let start = self.position;
            match c {
                b'+' => self.single(TokenKind::Plus),
                b'-' => self.single(TokenKind::Minus),
                b'*' => self.single(TokenKind::Star),
                b'(' => self.single(TokenKind::LParen),
                b')' => self.single(TokenKind::RParen),
                b'{' => self.single(TokenKind::LBrace),
                b'}' => self.single(TokenKind::RBrace),
                b'.' => self.single(TokenKind::Dot),
                b'=' => self.single(TokenKind::Eq),
                b':' => {
                    self.position += 1;
                    if self.peek() == Some(b'=') {
                        self.position += 1;
                        self.push_token(TokenKind::Walrus, start);
                    } else {
                        diagnostics.push(Diagnostic::error(
                            "Unexpected token ':'",
                            Span::new(start, start + 1),
                        ));
                        diagnostics.push(Diagnostic::hint(
                            "Maybe you meant to use the assignment operator ':='?",
                        ));
                    }
                }
                b'<' => self.one_or_two(TokenKind::Lt, TokenKind::Lte),
                b'>' => self.one_or_two(TokenKind::Gt, TokenKind::Gte),
                b'0'..=b'9' => self.number(),
                b'#' => self.character(start, diagnostics),
                b'"' => self.string(start, diagnostics),
                b' ' | b'\t' | b'\r' | b'\n' => self.position += 1,
                c if is_identifier_character(c) => self.identifier(),
                _ => {
                    // not necessarily a single byte at this point
                    let Some(invalid) = self.source[self.position..].chars().next() else {
                        break;
                    };
                    self.position += invalid.len_utf8();
                    diagnostics.push(Diagnostic::error(
                        format!("Invalid token '{invalid}'"),
                        Span::new(start, self.position),
                    ));
                }
            }
        }

        let len = self.source.len();
        self.tokens.push(Token {
            kind: TokenKind::End,
            lexeme: &self.source[len..],
            span: Span::new(len, len),
        });
        self.tokens
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.source[self.position..].chars().next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn push_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            lexeme: &self.source[start..self.position],
            span: Span::new(start, self.position),
        });
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.position;
        self.position += 1;
        self.push_token(kind, start);
    }

    /// Lex `<`/`<=` style pairs: the two character form wins when the next
    /// character is `=`.
    fn one_or_two(&mut self, short: TokenKind, long: TokenKind) {
        let start = self.position;
        self.position += 1;
        if self.peek() == Some(b'=') {
            self.position += 1;
            self.push_token(long, start);
        } else {
            self.push_token(short, start);
        }
    }

    fn number(&mut self) {
        let start = self.position;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.position += 1;
        }
        self.push_token(TokenKind::Number, start);
    }

    fn identifier(&mut self) {
        let start = self.position;
        while matches!(self.peek(), Some(c) if is_identifier_character(c)) {
            self.position += 1;
        }
        self.push_token(TokenKind::Identifier, start);
    }

    /// Lex a `#`-introduced character literal. The character after `#` is the
    /// value; a backslash starts an escape sequence whose second character is
    /// resolved when the literal is parsed.
    fn character(&mut self, start: usize, diagnostics: &mut Vec<Diagnostic>) {
        self.position += 1;
        match self.next_char() {
            None => diagnostics.push(Diagnostic::error(
                "Unexpected end of file after '#'",
                Span::new(start, self.position),
            )),
            Some('\\') => match self.next_char() {
                None => diagnostics.push(Diagnostic::error(
                    "Unexpected end of file after '#'",
                    Span::new(start, self.position),
                )),
                Some('n') => self.push_token(TokenKind::Char, start),
                Some(c) => {
                    diagnostics.push(Diagnostic::error(
                        format!("Invalid escape sequence '\\{c}'"),
                        Span::new(start, self.position),
                    ));
                    self.push_token(TokenKind::Char, start);
                }
            },
            Some(_) => self.push_token(TokenKind::Char, start),
        }
    }

    fn string(&mut self, start: usize, diagnostics: &mut Vec<Diagnostic>) {
        self.position += 1;
        loop {
            match self.next_char() {
                None => {
                    diagnostics.push(Diagnostic::error(
                        "Unterminated string literal",
                        Span::new(start, self.position),
                    ));
                    return;
                }
                Some('"') => {
                    self.push_token(TokenKind::Str, start);
                    return;
                }
                Some(_) => {}
            }
        }
    }
}

/// Identifiers may start with (and contain) digits; purely numeric lexemes
/// never reach this branch because the digit case fires first. The `/` is
/// allowed so path-like names lex as one identifier.
fn is_identifier_character(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'/'
}
