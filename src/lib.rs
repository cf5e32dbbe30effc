//! Compiler library for the Cat programming language.
//!
//! Cat is a small imperative expression language with integers, characters,
//! `let` bindings, `if` statements, and `print`. This crate lexes, parses,
//! and transpiles Cat programs into MIPS assembly runnable on the `spim`
//! simulator. The pipeline stages live in their own modules and communicate
//! through a shared diagnostics vector; [`transpile`] glues them together and
//! [`execute`] hands finished assembly to the simulator.

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod transpiler;

use std::{error::Error, fs, process::Command};

use lexer::Lexer;
use parser::Parser;
use transpiler::MipsTranspiler;

/// Transpile a Cat program into MIPS assembly.
///
/// All three stages run over one diagnostics vector, so a parse error does
/// not hide the semantic errors in the statements that still parsed. The
/// result is the assembly text when no diagnostic was recorded, otherwise the
/// rendered diagnostics. `file` is only used for rendering; `"<repl>"` is the
/// conventional placeholder for interactive input.
pub fn transpile(source: &str, file: &str) -> Result<String, String> {
    let mut diagnostics = vec![];

    let tokens = Lexer::new(source).lex(&mut diagnostics);
    let program = Parser::new(tokens, &mut diagnostics).parse();
    let result = MipsTranspiler::new(program, &mut diagnostics).transpile();

    if diagnostics.is_empty() {
        Ok(result)
    } else {
        Err(diagnostic::render_all(&diagnostics, file, source))
    }
}

const SPIM_EXE: &str = "spim";
const SPIM_INPUT: &str = "cat-out.mips";

/// Run transpiled assembly through the `spim` simulator and capture what it
/// printed. The program goes through a temporary file in the working
/// directory, which is removed again regardless of how the simulator fared.
pub fn execute(program: &str) -> Result<String, Box<dyn Error>> {
    fs::write(SPIM_INPUT, program)?;

    let output = Command::new(SPIM_EXE).args(["-f", SPIM_INPUT]).output();
    fs::remove_file(SPIM_INPUT)?;

    let output = output?;
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}
