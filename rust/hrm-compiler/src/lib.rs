//! HRM Compiler
//!
//! Turns program source text into an [`hrm_core::Program`].
//!
//! Source is line oriented: one instruction, label (`name:`) or comment
//! (`# text`) per line. Mnemonics are case-insensitive; register operands are
//! written `x` (direct) or `[x]` (indirect), and a literal that parses as an
//! integer is an integer key.

pub mod compiler;
pub mod diagnostics;
pub mod style;

use compiler::lexer::Lexer;
use compiler::parser::Parser;
use hrm_core::Program;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] compiler::lexer::LexError),
    #[error("parse error: {0}")]
    Parse(#[from] compiler::parser::ParseError),
}

/// A compiled program together with the 1-based source line of every
/// instruction, for diagnostics that point back into the source.
#[derive(Debug, Clone)]
pub struct SourceProgram {
    pub program: Program,
    pub lines: Vec<usize>,
}

/// Compile program source into a [`Program`].
pub fn compile(source: &str) -> Result<Program, CompileError> {
    compile_source(source).map(|compiled| compiled.program)
}

/// Compile program source, keeping the source line of each instruction.
pub fn compile_source(source: &str) -> Result<SourceProgram, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    let spanned = Parser::new(tokens).parse_spanned()?;
    let (instructions, lines): (Vec<_>, Vec<_>) =
        spanned.into_iter().map(|(instruction, span)| (instruction, span.line)).unzip();
    Ok(SourceProgram { program: Program::new(instructions), lines })
}

/// Render a compile error as a colored diagnostic.
pub fn format_error(error: &CompileError, source: &str, filename: &str) -> String {
    diagnostics::format_compile_error(error, source, filename).render_ansi()
}
