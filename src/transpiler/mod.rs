//! MIPS code generation.
//!
//! [`MipsTranspiler`] walks the AST once, threading four pieces of state: a
//! register pool bitset, a stack cursor, a scope arena, and a label counter.
//! Every expression visit returns the register holding its value; the caller
//! releases it once the value is consumed. Semantic errors abort the current
//! statement through an interrupt caught in the program loop; running out of
//! registers aborts the remaining program.

mod instruction;
mod register;
mod scope;

pub use instruction::Instruction;
pub use register::{Reg, RegisterPool, TEMPORARIES};

use log::debug;

use crate::{
    ast::{BinaryExpr, Expr, IdentifierExpr, IfStmt, LetStmt, PrintStmt, Program, Stmt},
    diagnostic::Diagnostic,
    lexer::{Span, TokenKind},
};

use self::scope::ScopeArena;

enum Interrupt {
    /// Abort the current statement, keep transpiling the next one.
    Statement,
    /// Abort the remaining program.
    Transpilation,
}

type Visit<T> = Result<T, Interrupt>;

/// The call-frame cursor. Slots are 4 bytes; `push` returns the position of
/// the new slot counted from frame entry in push order.
#[derive(Debug, Default)]
struct Stack {
    size: i32,
}

impl Stack {
    fn push(&mut self) -> i32 {
        let slot = self.size;
        self.size += 4;
        slot
    }

    fn pop(&mut self) {
        self.size -= 4;
    }

    fn size(&self) -> i32 {
        self.size
    }
}

pub struct MipsTranspiler<'a, 'd> {
    program: Program<'a>,
    diagnostics: &'d mut Vec<Diagnostic>,
    registers: RegisterPool,
    stack: Stack,
    scopes: ScopeArena,
    label_counter: usize,
    result: String,
}

impl<'a, 'd> MipsTranspiler<'a, 'd> {
    pub fn new(program: Program<'a>, diagnostics: &'d mut Vec<Diagnostic>) -> Self {
        Self {
            program,
            diagnostics,
            registers: RegisterPool::default(),
            stack: Stack::default(),
            scopes: ScopeArena::default(),
            label_counter: 0,
            result: String::new(),
        }
    }

    pub fn transpile(mut self) -> String {
        self.emit_raw(".text");
        self.emit_raw(".globl main");
        self.emit_raw("main:");

        let program = std::mem::take(&mut self.program);
        for stmt in &program.stmts {
            match self.visit_stmt(stmt) {
                Ok(()) => {}
                Err(Interrupt::Statement) => continue,
                Err(Interrupt::Transpilation) => break,
            }
        }

        self.emit(Instruction::Jr(Reg::Ra));
        self.result
    }

    fn emit(&mut self, instruction: Instruction) {
        self.result.push_str(&instruction.to_string());
        self.result.push('\n');
    }

    fn emit_raw(&mut self, line: &str) {
        self.result.push_str(line);
        self.result.push('\n');
    }

    fn find_register(&mut self, span: Span) -> Visit<Reg> {
        match self.registers.find_register() {
            Some(reg) => {
                debug!("allocating register {reg}");
                Ok(reg)
            }
            None => {
                self.diagnostics.push(Diagnostic::error(
                    "Ran out of registers during code generation",
                    span,
                ));
                Err(Interrupt::Transpilation)
            }
        }
    }

    fn release_register(&mut self, reg: Reg) {
        debug!("releasing register {reg}");
        self.registers.release_register(reg);
    }

    /// Push a 4-byte stack slot, adjusting `$sp`, and return its position.
    fn push_slot(&mut self) -> i32 {
        self.emit(Instruction::Addi(Reg::Sp, Reg::Sp, -4));
        self.stack.push()
    }

    /// The `$sp`-relative offset of a slot, rebased against the current
    /// cursor so bindings stay addressable after later pushes move `$sp`.
    fn offset_of(&self, slot: i32) -> i32 {
        self.stack.size() - 4 - slot
    }

    fn next_label(&mut self) -> usize {
        let label = self.label_counter;
        self.label_counter += 1;
        label
    }

    fn visit_stmt(&mut self, stmt: &Stmt<'a>) -> Visit<()> {
        match stmt {
            Stmt::Let(stmt) => self.visit_let_stmt(stmt),
            Stmt::If(stmt) => self.visit_if_stmt(stmt),
            Stmt::Print(stmt) => self.visit_print_stmt(stmt),
            Stmt::Expr(stmt) => {
                let reg = self.visit_expr(&stmt.expr)?;
                self.release_register(reg);
                Ok(())
            }
        }
    }

    fn visit_let_stmt(&mut self, stmt: &LetStmt<'a>) -> Visit<()> {
        let rs = self.visit_expr(&stmt.value)?;
        let slot = self.push_slot();
        self.scopes.declare(stmt.name(), slot);
        self.emit(Instruction::Sw(rs, self.offset_of(slot), Reg::Sp));
        self.release_register(rs);
        Ok(())
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt<'a>) -> Visit<()> {
        let rc = self.visit_expr(&stmt.condition)?;

        let label = self.next_label();
        let else_label = format!("ELSE{label}");
        let exit_label = format!("EXIT{label}");

        let target = if stmt.else_branch.is_empty() {
            exit_label.clone()
        } else {
            else_label.clone()
        };
        self.emit(Instruction::Beq(rc, Reg::Zero, target));
        self.release_register(rc);

        self.visit_branch(&stmt.then_branch)?;

        if !stmt.else_branch.is_empty() {
            self.emit(Instruction::J(exit_label.clone()));
            self.emit(Instruction::Label(else_label));
            self.visit_branch(&stmt.else_branch)?;
        }

        self.emit(Instruction::Label(exit_label));
        Ok(())
    }

    /// Run one `if` branch in a fresh scope. The scope is left (and its stack
    /// slots cleaned up) even when a statement inside aborted, so the walker
    /// state stays consistent for the statements after the `if`.
    fn visit_branch(&mut self, branch: &[Stmt<'a>]) -> Visit<()> {
        self.scopes.enter();

        let mut result = Ok(());
        for stmt in branch {
            if let Err(interrupt) = self.visit_stmt(stmt) {
                result = Err(interrupt);
                break;
            }
        }

        let slots = self.scopes.exit();
        for _ in 0..slots {
            self.emit(Instruction::Addi(Reg::Sp, Reg::Sp, 4));
            self.stack.pop();
        }

        result
    }

    fn visit_print_stmt(&mut self, stmt: &PrintStmt<'a>) -> Visit<()> {
        for expr in &stmt.exprs {
            if let Expr::Str(string) = expr {
                // No data section in the output format, so strings go out one
                // character at a time.
                for c in string.value.chars() {
                    self.emit(Instruction::Li(Reg::A0, c as i32));
                    self.emit(Instruction::Li(Reg::V0, 11));
                    self.emit(Instruction::Syscall);
                }
                continue;
            }

            let reg = self.visit_expr(expr)?;
            let service = if expr.token().kind == TokenKind::Char {
                11
            } else {
                1
            };
            self.emit(Instruction::Move(Reg::A0, reg));
            self.emit(Instruction::Li(Reg::V0, service));
            self.emit(Instruction::Syscall);
            self.release_register(reg);
        }
        Ok(())
    }

    fn visit_expr(&mut self, expr: &Expr<'a>) -> Visit<Reg> {
        match expr {
            Expr::Number(number) => {
                let reg = self.find_register(number.token.span)?;
                self.emit(Instruction::Li(reg, number.value));
                Ok(reg)
            }
            Expr::Str(string) => {
                self.diagnostics.push(Diagnostic::error(
                    "String literals can only be used in print statements",
                    string.token.span,
                ));
                Err(Interrupt::Statement)
            }
            Expr::Identifier(identifier) => self.visit_identifier(identifier),
            Expr::Add(expr) => self.visit_add_expr(expr),
            Expr::Sub(expr) => self.visit_sub_expr(expr),
            Expr::Mult(expr) => self.visit_mult_expr(expr),
            Expr::Assign(expr) => self.visit_assign_expr(expr),
            Expr::Comparison(expr) => self.visit_comparison_expr(expr),
            Expr::Grouping(grouping) => self.visit_expr(&grouping.expr),
        }
    }

    fn visit_identifier(&mut self, identifier: &IdentifierExpr<'a>) -> Visit<Reg> {
        let Some(slot) = self.scopes.lookup(identifier.name()) else {
            return Err(self.unbound_variable(identifier));
        };
        let rs = self.find_register(identifier.token.span)?;
        self.emit(Instruction::Lw(rs, self.offset_of(slot), Reg::Sp));
        Ok(rs)
    }

    fn unbound_variable(&mut self, identifier: &IdentifierExpr<'a>) -> Interrupt {
        let name = identifier.name();
        self.diagnostics.push(Diagnostic::error(
            format!("Unbound variable {name}"),
            identifier.token.span,
        ));
        self.diagnostics.push(Diagnostic::hint(format!(
            "Maybe you forgot to declare the variable?\n\n\t let {name} := <value>"
        )));
        Interrupt::Statement
    }

    fn visit_add_expr(&mut self, expr: &BinaryExpr<'a>) -> Visit<Reg> {
        let lhs = self.visit_expr(&expr.lhs)?;

        if let Some(value) = bare_number(&expr.rhs) {
            self.emit(Instruction::Addi(lhs, lhs, value));
        } else {
            let rhs = self.visit_expr(&expr.rhs)?;
            self.emit(Instruction::Add(lhs, lhs, rhs));
            self.release_register(rhs);
        }

        Ok(lhs)
    }

    fn visit_sub_expr(&mut self, expr: &BinaryExpr<'a>) -> Visit<Reg> {
        let lhs = self.visit_expr(&expr.lhs)?;

        if let Some(value) = bare_number(&expr.rhs) {
            self.emit(Instruction::Addi(lhs, lhs, -value));
        } else {
            let rhs = self.visit_expr(&expr.rhs)?;
            self.emit(Instruction::Sub(lhs, lhs, rhs));
            self.release_register(rhs);
        }

        Ok(lhs)
    }

    fn visit_mult_expr(&mut self, expr: &BinaryExpr<'a>) -> Visit<Reg> {
        let lhs = self.visit_expr(&expr.lhs)?;
        let rhs = self.visit_expr(&expr.rhs)?;

        self.emit(Instruction::Mult(lhs, rhs));
        self.emit(Instruction::Mflo(lhs));

        self.release_register(rhs);
        Ok(lhs)
    }

    fn visit_assign_expr(&mut self, expr: &BinaryExpr<'a>) -> Visit<Reg> {
        let Expr::Identifier(identifier) = &*expr.lhs else {
            self.diagnostics.push(Diagnostic::error(
                "Left side of assignment must be a variable.",
                expr.lhs.token().span,
            ));
            return Err(Interrupt::Statement);
        };

        let Some(slot) = self.scopes.lookup(identifier.name()) else {
            return Err(self.unbound_variable(identifier));
        };

        let rs = self.visit_expr(&expr.rhs)?;
        self.emit(Instruction::Sw(rs, self.offset_of(slot), Reg::Sp));
        Ok(rs)
    }

    /// Comparisons come out as a 0/1 value in the left register, derived from
    /// `slt`/`sltu` per the usual MIPS idioms.
    fn visit_comparison_expr(&mut self, expr: &BinaryExpr<'a>) -> Visit<Reg> {
        let lhs = self.visit_expr(&expr.lhs)?;
        let rhs = self.visit_expr(&expr.rhs)?;

        match expr.token.kind {
            TokenKind::Lt => self.emit(Instruction::Slt(lhs, lhs, rhs)),
            TokenKind::Gt => self.emit(Instruction::Slt(lhs, rhs, lhs)),
            TokenKind::Lte => {
                self.emit(Instruction::Slt(lhs, rhs, lhs));
                self.emit(Instruction::Xori(lhs, lhs, 1));
            }
            TokenKind::Gte => {
                self.emit(Instruction::Slt(lhs, lhs, rhs));
                self.emit(Instruction::Xori(lhs, lhs, 1));
            }
            TokenKind::Eq => {
                self.emit(Instruction::Subu(lhs, lhs, rhs));
                self.emit(Instruction::Sltu(lhs, Reg::Zero, lhs));
                self.emit(Instruction::Xori(lhs, lhs, 1));
            }
            kind => unreachable!("not a comparison operator: {kind}"),
        }

        self.release_register(rhs);
        Ok(lhs)
    }
}

/// The immediate fast path applies to plain number literals only; character
/// literals and parenthesized numbers take the register route.
fn bare_number(expr: &Expr) -> Option<i32> {
    match expr {
        Expr::Number(number) if number.token.kind == TokenKind::Number => Some(number.value),
        _ => None,
    }
}
