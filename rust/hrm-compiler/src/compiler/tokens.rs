use hrm_core::Mnemonic;
use std::fmt;

/// Source location of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Token types for program source
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `# text` line, text trimmed
    Comment(String),
    /// `name:` line
    Label(String),
    Mnemonic(Mnemonic),
    /// Operand word following a mnemonic on the same line
    Argument(String),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Comment(text) => write!(f, "comment '{}'", text),
            TokenKind::Label(name) => write!(f, "label '{}'", name),
            TokenKind::Mnemonic(m) => write!(f, "instruction {}", m),
            TokenKind::Argument(arg) => write!(f, "argument '{}'", arg),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
