//! Pratt parser for the Cat language.
//!
//! Expressions are parsed by precedence climbing over two fixed dispatch
//! tables (prefix and infix) keyed on [`TokenKind`]. Statement keywords are
//! ordinary identifiers recognized by lexeme. Errors push diagnostics and
//! raise a [`SyncPoint`], which the statement loop catches before skipping to
//! the next statement terminator, so one broken statement never takes the
//! rest of the program with it.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{
    ast::{
        BinaryExpr, Expr, ExprStmt, GroupingExpr, IdentifierExpr, IfStmt, LetStmt, NumberExpr,
        PrintStmt, Program, Stmt, StrExpr,
    },
    diagnostic::Diagnostic,
    lexer::{Span, Token, TokenKind},
};

/// Recovery signal raised on a parse error and caught at the statement
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPoint;

pub type ParseResult<T> = Result<T, SyncPoint>;

static PRECEDENCE: Lazy<HashMap<TokenKind, u8>> = Lazy::new(|| {
    HashMap::from([
        (TokenKind::Number, 0),
        (TokenKind::Identifier, 0),
        (TokenKind::Char, 0),
        (TokenKind::Walrus, 1),
        (TokenKind::Lt, 2),
        (TokenKind::Lte, 2),
        (TokenKind::Gt, 2),
        (TokenKind::Gte, 2),
        (TokenKind::Eq, 2),
        (TokenKind::Plus, 2),
        (TokenKind::Minus, 2),
        (TokenKind::Star, 3),
        (TokenKind::LParen, 8),
    ])
});

fn precedence(kind: TokenKind) -> u8 {
    PRECEDENCE.get(&kind).copied().unwrap_or(0)
}

pub struct Parser<'a, 'd> {
    tokens: Vec<Token<'a>>,
    current: usize,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl<'a, 'd> Parser<'a, 'd> {
    pub fn new(tokens: Vec<Token<'a>>, diagnostics: &'d mut Vec<Diagnostic>) -> Self {
        Self {
            tokens,
            current: 0,
            diagnostics,
        }
    }

    /// Parse the whole token stream into a [`Program`]. Statements that fail
    /// to parse are dropped after synchronization; the resulting program
    /// contains every statement that parsed cleanly.
    pub fn parse(mut self) -> Program<'a> {
        let mut program = Program::default();

        while !self.is_at_end() {
            match self.parse_stmt() {
                Ok(stmt) => program.stmts.push(stmt),
                Err(SyncPoint) => self.synchronize(),
            }
        }

        program
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.current += 1;
        Some(token)
    }

    fn is_at_end(&self) -> bool {
        self.peek().map_or(true, |token| token.kind == TokenKind::End)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |token| token.kind == kind)
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume the next token when its lexeme matches; keywords are plain
    /// identifiers, so `then`/`else`/`end` are recognized this way.
    fn match_lexeme(&mut self, lexeme: &str) -> bool {
        let matched = self.peek().map_or(false, |token| {
            token.kind == TokenKind::Identifier && token.lexeme == lexeme
        });
        if matched {
            self.advance();
        }
        matched
    }

    fn current_span(&self) -> Span {
        self.peek()
            .or_else(|| self.tokens.last().copied())
            .map(|token| token.span)
            .unwrap_or_default()
    }

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    fn hint(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::hint(message));
    }

    /// Advance past the next `.`, or to the end of the stream, so statement
    /// parsing can resume on fresh ground.
    fn synchronize(&mut self) {
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::End {
                return;
            }
            self.advance();
            if token.kind == TokenKind::Dot {
                return;
            }
        }
    }

    fn consume(&mut self, kind: TokenKind) -> ParseResult<Token<'a>> {
        let span = self.current_span();
        let Some(token) = self.advance() else {
            self.error("Unexpected end of file", span);
            return Err(SyncPoint);
        };

        if token.kind == kind {
            return Ok(token);
        }

        if token.kind == TokenKind::End {
            self.error("Unexpected end of file", token.span);
        } else {
            self.error(format!("Unexpected token '{}'", token.kind), token.span);
        }

        if kind == TokenKind::Dot {
            self.hint("Statements must end with a '.'");
        } else {
            self.hint(format!("A(n) {kind} was expected"));
        }

        Err(SyncPoint)
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt<'a>> {
        let Some(token) = self.peek() else {
            return Err(SyncPoint);
        };

        if token.kind == TokenKind::Identifier {
            match token.lexeme {
                "let" => {
                    self.advance();
                    return self.parse_let_stmt().map(Stmt::Let);
                }
                "if" => {
                    self.advance();
                    return self.parse_if_stmt().map(Stmt::If);
                }
                "print" => {
                    self.advance();
                    return self.parse_print_stmt().map(Stmt::Print);
                }
                _ => {}
            }
        }

        let expr = self.parse_expr(0)?;
        self.consume(TokenKind::Dot)?;
        Ok(Stmt::Expr(ExprStmt { expr }))
    }

    fn parse_let_stmt(&mut self) -> ParseResult<LetStmt<'a>> {
        if let Some(token) = self.peek() {
            if token.kind != TokenKind::Identifier {
                self.error("Expected identifier after let", token.span);
                return Err(SyncPoint);
            }
        }

        // Parse the left-hand side one level above the walrus so `:=` stays a
        // statement-level join instead of folding into the expression.
        let identifier = self.parse_expr(precedence(TokenKind::Walrus) + 1)?;

        if self.consume(TokenKind::Walrus).is_err() {
            self.hint("Maybe you meant to use the walrus operator ':='?");
            return Err(SyncPoint);
        }

        let span = identifier.token().span;
        let Expr::Identifier(identifier) = identifier else {
            self.error("Expected identifier after let", span);
            return Err(SyncPoint);
        };

        let value = self.parse_expr(0)?;
        self.consume(TokenKind::Dot)?;

        Ok(LetStmt {
            identifier: identifier.token,
            value,
        })
    }

    fn parse_if_stmt(&mut self) -> ParseResult<IfStmt<'a>> {
        if self.is_at_end() {
            let span = self.current_span();
            self.error("Expected condition after if", span);
            return Err(SyncPoint);
        }

        let condition = self.parse_expr(0)?;

        if !self.match_lexeme("then") {
            let span = self.current_span();
            self.error("Expected 'then' after if statement condition", span);
            self.hint("Insert 'then' to start the statement body");
            return Err(SyncPoint);
        }

        let mut then_branch = vec![];
        let mut else_branch = vec![];

        loop {
            if self.is_at_end() {
                let span = self.current_span();
                self.error("Expected 'end' after if statement body", span);
                self.hint("Add 'end' to the end of the if statement");
                return Err(SyncPoint);
            }
            if self.match_lexeme("end") {
                self.matches(TokenKind::Dot);
                return Ok(IfStmt {
                    condition,
                    then_branch,
                    else_branch,
                });
            }
            if self.match_lexeme("else") {
                break;
            }
            then_branch.push(self.parse_stmt()?);
        }

        loop {
            if self.is_at_end() {
                let span = self.current_span();
                self.error("Unterminated if statement", span);
                self.hint("Add 'end' to the end of the if statement");
                return Err(SyncPoint);
            }
            if self.match_lexeme("end") {
                self.matches(TokenKind::Dot);
                return Ok(IfStmt {
                    condition,
                    then_branch,
                    else_branch,
                });
            }
            else_branch.push(self.parse_stmt()?);
        }
    }

    fn parse_print_stmt(&mut self) -> ParseResult<PrintStmt<'a>> {
        let mut exprs = vec![];

        while !self.is_at_end() && !self.check(TokenKind::Dot) {
            exprs.push(self.parse_expr(0)?);
        }

        self.consume(TokenKind::Dot)?;
        Ok(PrintStmt { exprs })
    }

    fn parse_expr(&mut self, min_precedence: u8) -> ParseResult<Expr<'a>> {
        let span = self.current_span();
        let Some(token) = self.advance() else {
            self.error("Unexpected end of file", span);
            return Err(SyncPoint);
        };

        let mut lhs = self.parse_prefix(token)?;

        while let Some(next) = self.peek() {
            if min_precedence >= precedence(next.kind) {
                break;
            }
            self.advance();
            lhs = self.parse_infix(next, lhs)?;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self, token: Token<'a>) -> ParseResult<Expr<'a>> {
        match token.kind {
            TokenKind::Number => {
                let Ok(value) = token.lexeme.parse() else {
                    self.error("Number literal out of range", token.span);
                    return Err(SyncPoint);
                };
                Ok(Expr::Number(NumberExpr { token, value }))
            }
            TokenKind::Char => Ok(Expr::Number(NumberExpr {
                token,
                value: char_value(token.lexeme),
            })),
            TokenKind::Str => {
                let body = &token.lexeme[1..token.lexeme.len() - 1];
                let value = unescape::unescape(body).unwrap_or_else(|| body.to_string());
                Ok(Expr::Str(StrExpr { token, value }))
            }
            TokenKind::Identifier => Ok(Expr::Identifier(IdentifierExpr { token })),
            TokenKind::LParen => {
                let expr = self.parse_expr(0)?;
                self.consume(TokenKind::RParen)?;
                Ok(Expr::Grouping(GroupingExpr {
                    token,
                    expr: Box::new(expr),
                }))
            }
            _ => {
                self.error(
                    format!("Invalid start of prefix expression: '{}'", token.lexeme),
                    token.span,
                );
                Err(SyncPoint)
            }
        }
    }

    fn parse_infix(&mut self, token: Token<'a>, lhs: Expr<'a>) -> ParseResult<Expr<'a>> {
        match token.kind {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star => {
                let rhs = self.parse_expr(precedence(token.kind))?;
                let expr = BinaryExpr {
                    token,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                Ok(match token.kind {
                    TokenKind::Plus => Expr::Add(expr),
                    TokenKind::Minus => Expr::Sub(expr),
                    _ => Expr::Mult(expr),
                })
            }
            TokenKind::Walrus => {
                if lhs.token().kind != TokenKind::Identifier {
                    self.error(
                        "Left side of assignment must be a variable.",
                        lhs.token().span,
                    );
                    return Err(SyncPoint);
                }
                let rhs = self.parse_expr(precedence(token.kind))?;
                Ok(Expr::Assign(BinaryExpr {
                    token,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }))
            }
            TokenKind::Lt | TokenKind::Lte | TokenKind::Gt | TokenKind::Gte | TokenKind::Eq => {
                // One level below their own precedence, so a comparison binds
                // looser than the arithmetic on either side of it.
                let rhs = self.parse_expr(precedence(token.kind) - 1)?;
                Ok(Expr::Comparison(BinaryExpr {
                    token,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }))
            }
            _ => {
                self.error(
                    format!("Invalid start of infix expression: '{}'", token.lexeme),
                    token.span,
                );
                Err(SyncPoint)
            }
        }
    }
}

/// Resolve a character literal lexeme (`#a`, `#\n`) to its code point. Escape
/// characters other than `n` were already reported by the lexer and resolve
/// to themselves.
fn char_value(lexeme: &str) -> i32 {
    let mut chars = lexeme[1..].chars();
    match chars.next() {
        Some('\\') => match chars.next() {
            Some('n') => '\n' as i32,
            Some(c) => c as i32,
            None => 0,
        },
        Some(c) => c as i32,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
        let mut diagnostics = vec![];
        let tokens = Lexer::new(source).lex(&mut diagnostics);
        let program = Parser::new(tokens, &mut diagnostics).parse();
        (program, diagnostics)
    }

    fn single_expr<'a>(program: &'a Program) -> &'a Expr<'a> {
        assert_eq!(program.stmts.len(), 1);
        match &program.stmts[0] {
            Stmt::Expr(stmt) => &stmt.expr,
            stmt => panic!("expected expression statement, got {stmt:?}"),
        }
    }

    #[test]
    fn test_parse_number_statement() {
        let (program, diagnostics) = parse("5.");
        assert!(diagnostics.is_empty());
        match single_expr(&program) {
            Expr::Number(number) => assert_eq!(number.value, 5),
            expr => panic!("expected number, got {expr:?}"),
        }
    }

    #[test]
    fn test_empty_source_parses_to_empty_program() {
        let (program, diagnostics) = parse("");
        assert!(diagnostics.is_empty());
        assert!(program.stmts.is_empty());
    }

    #[test]
    fn test_star_binds_tighter_than_plus() {
        let (program, diagnostics) = parse("1 + 2 * 3.");
        assert!(diagnostics.is_empty());
        let Expr::Add(add) = single_expr(&program) else {
            panic!("expected addition at the root");
        };
        assert!(matches!(*add.lhs, Expr::Number(_)));
        assert!(matches!(*add.rhs, Expr::Mult(_)));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let (program, diagnostics) = parse("1 - 2 - 3.");
        assert!(diagnostics.is_empty());
        let Expr::Sub(outer) = single_expr(&program) else {
            panic!("expected subtraction at the root");
        };
        assert!(matches!(*outer.lhs, Expr::Sub(_)));
        assert!(matches!(*outer.rhs, Expr::Number(_)));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let (program, diagnostics) = parse("(1 + 2) - 3.");
        assert!(diagnostics.is_empty());
        let Expr::Sub(sub) = single_expr(&program) else {
            panic!("expected subtraction at the root");
        };
        assert!(matches!(*sub.lhs, Expr::Grouping(_)));
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        let (program, diagnostics) = parse("x + 1 < y * 2.");
        assert!(diagnostics.is_empty());
        let Expr::Comparison(comparison) = single_expr(&program) else {
            panic!("expected comparison at the root");
        };
        assert!(matches!(*comparison.lhs, Expr::Add(_)));
        assert!(matches!(*comparison.rhs, Expr::Mult(_)));
    }

    #[test]
    fn test_parse_let_statement() {
        let (program, diagnostics) = parse("let x := 10.");
        assert!(diagnostics.is_empty());
        assert_eq!(program.stmts.len(), 1);
        let Stmt::Let(stmt) = &program.stmts[0] else {
            panic!("expected let statement");
        };
        assert_eq!(stmt.name(), "x");
        assert!(matches!(stmt.value, Expr::Number(_)));
    }

    #[test]
    fn test_let_without_identifier_recovers() {
        let (program, diagnostics) = parse("let := 1. 5.");
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(program.stmts[0], Stmt::Expr(_)));
        assert!(diagnostics
            .iter()
            .any(|diagnostic| diagnostic.message == "Expected identifier after let"));
        // The error points at the walrus token.
        let error = diagnostics
            .iter()
            .find(|diagnostic| diagnostic.message == "Expected identifier after let")
            .unwrap();
        assert_eq!(error.span, Some(Span::new(4, 6)));
    }

    #[test]
    fn test_parse_if_statement() {
        let (program, diagnostics) = parse("if x then 1. end");
        assert!(diagnostics.is_empty());
        let Stmt::If(stmt) = &program.stmts[0] else {
            panic!("expected if statement");
        };
        assert!(matches!(stmt.condition, Expr::Identifier(_)));
        assert_eq!(stmt.then_branch.len(), 1);
        assert!(stmt.else_branch.is_empty());
    }

    #[test]
    fn test_parse_if_else_statement() {
        let (program, diagnostics) = parse("if x then 1. else 2. 3. end");
        assert!(diagnostics.is_empty());
        let Stmt::If(stmt) = &program.stmts[0] else {
            panic!("expected if statement");
        };
        assert_eq!(stmt.then_branch.len(), 1);
        assert_eq!(stmt.else_branch.len(), 2);
    }

    #[test]
    fn test_if_statement_tolerates_trailing_dot() {
        let (program, diagnostics) = parse("if x then 1. end.");
        assert!(diagnostics.is_empty());
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(program.stmts[0], Stmt::If(_)));
    }

    #[test]
    fn test_if_without_then_is_an_error() {
        let (_, diagnostics) = parse("if x 1. end");
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "Expected 'then' after if statement condition"));
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "Insert 'then' to start the statement body"));
    }

    #[test]
    fn test_unterminated_if_is_an_error() {
        let (_, diagnostics) = parse("if x then 1.");
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "Expected 'end' after if statement body"));
    }

    #[test]
    fn test_parse_print_statement() {
        let (program, diagnostics) = parse("print 1 #a x.");
        assert!(diagnostics.is_empty());
        let Stmt::Print(stmt) = &program.stmts[0] else {
            panic!("expected print statement");
        };
        assert_eq!(stmt.exprs.len(), 3);
    }

    #[test]
    fn test_parse_empty_print_statement() {
        let (program, diagnostics) = parse("print.");
        assert!(diagnostics.is_empty());
        let Stmt::Print(stmt) = &program.stmts[0] else {
            panic!("expected print statement");
        };
        assert!(stmt.exprs.is_empty());
    }

    #[test]
    fn test_missing_terminator_reports_error_and_hint() {
        let (_, diagnostics) = parse("5");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, "Unexpected end of file");
        assert_eq!(diagnostics[1].message, "Statements must end with a '.'");
    }

    #[test]
    fn test_walrus_expression_statement() {
        let (program, diagnostics) = parse("x := x + 1.");
        assert!(diagnostics.is_empty());
        assert!(matches!(single_expr(&program), Expr::Assign(_)));
    }

    #[test]
    fn test_walrus_requires_identifier_on_the_left() {
        let (_, diagnostics) = parse("1 := 2.");
        assert!(diagnostics
            .iter()
            .any(|d| d.message == "Left side of assignment must be a variable."));
    }

    #[test]
    fn test_recovery_continues_after_broken_statement() {
        let (program, diagnostics) = parse("* 1. 2.");
        assert!(!diagnostics.is_empty());
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(program.stmts[0], Stmt::Expr(_)));
    }

    #[test]
    fn test_character_literal_values() {
        let (program, _) = parse("#a.");
        match single_expr(&program) {
            Expr::Number(number) => {
                assert_eq!(number.value, 97);
                assert_eq!(number.token.kind, TokenKind::Char);
            }
            expr => panic!("expected number, got {expr:?}"),
        }

        let (program, _) = parse("#\\n.");
        match single_expr(&program) {
            Expr::Number(number) => assert_eq!(number.value, 10),
            expr => panic!("expected number, got {expr:?}"),
        }
    }

    #[test]
    fn test_string_literal_unescapes() {
        let (program, diagnostics) = parse("print \"a\\nb\".");
        assert!(diagnostics.is_empty());
        let Stmt::Print(stmt) = &program.stmts[0] else {
            panic!("expected print statement");
        };
        let Expr::Str(string) = &stmt.exprs[0] else {
            panic!("expected string literal");
        };
        assert_eq!(string.value, "a\nb");
    }

    #[test]
    fn test_unknown_prefix_token_is_an_error() {
        let (_, diagnostics) = parse("*.");
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("Invalid start of prefix expression")));
    }
}
