//! Diagnostics shared by every stage of the pipeline.
//!
//! Stages report problems by pushing [`Diagnostic`] values into one growable
//! vector owned by the driver; nothing in the pipeline panics on bad input.
//! Rendering is pure and only happens once the driver has decided the
//! transpilation failed.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::lexer::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Hint,
}

/// A single error or hint. Errors carry the span they point at; hints refine
/// the error that precedes them and may omit theirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn hint(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Hint,
            message: message.into(),
            span: None,
        }
    }

    /// Render this diagnostic against the source it was produced from.
    pub fn render(&self, file: &str, source: &str) -> String {
        match self.severity {
            Severity::Error => self.render_error(file, source),
            Severity::Hint => format!("{} {}\n\n", "hint:".blue(), self.message),
        }
    }

    fn render_error(&self, file: &str, source: &str) -> String {
        let mut output = format!("{} {}\n", "error:".red(), self.message);

        if let Some(span) = self.span {
            let (line, col, text) = locate(source, span.start);
            let gutter = line.to_string();
            let pad = " ".repeat(gutter.len());

            output.push_str(&format!("{pad}{} {file}:{line}:{col}\n", "-->".blue()));
            output.push_str(&format!("{pad} |\n"));
            output.push_str(&format!("{gutter} | {text}\n"));
            output.push_str(&format!("{pad} | {caret}^\n", caret = " ".repeat(col - 1)));
        }

        output.push('\n');
        output
    }
}

/// Render a whole sequence of diagnostics into one report.
pub fn render_all(diagnostics: &[Diagnostic], file: &str, source: &str) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| diagnostic.render(file, source))
        .collect()
}

/// Resolve a byte offset to a 1-based line/column pair and the text of the
/// line it falls on, by scanning the source for line starts.
fn locate(source: &str, offset: usize) -> (usize, usize, &str) {
    let mut starts = vec![0];
    for (position, byte) in source.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(position + 1);
        }
    }

    let index = starts.partition_point(|&start| start <= offset) - 1;
    let start = starts[index];
    let end = source[start..]
        .find('\n')
        .map(|newline| start + newline)
        .unwrap_or(source.len());

    (index + 1, offset - start + 1, &source[start..end])
}
