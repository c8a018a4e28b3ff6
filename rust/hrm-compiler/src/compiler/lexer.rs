//! Line-oriented lexer for program source.
//!
//! Every non-blank line is one of: a `#` comment, a `name:` label, or a
//! mnemonic followed by its operand words. Jump mnemonics take the rest of
//! the line as a single operand so label names may contain spaces.

use crate::compiler::tokens::{Span, Token, TokenKind};
use hrm_core::{Mnemonic, OperandShape};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unrecognized line '{text}' at line {line}, col {col}")]
    UnknownLine { text: String, line: usize, col: usize },
    #[error("empty label name at line {line}, col {col}")]
    EmptyLabel { line: usize, col: usize },
}

/// Split a line into words, keeping each word's 1-based column.
fn words(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    for (col, (byte, ch)) in line.char_indices().enumerate() {
        if ch.is_whitespace() {
            if let Some((s_col, s_byte)) = start.take() {
                out.push((s_col, &line[s_byte..byte]));
            }
        } else if start.is_none() {
            start = Some((col + 1, byte));
        }
    }
    if let Some((s_col, s_byte)) = start {
        out.push((s_col, &line[s_byte..]));
    }
    out
}

pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut last_line = 0;
        for (number, raw) in self.source.lines().enumerate() {
            let line = number + 1;
            last_line = line;
            self.lex_line(raw, line, &mut tokens)?;
        }
        tokens.push(Token::new(TokenKind::Eof, Span::new(last_line + 1, 1)));
        Ok(tokens)
    }

    fn lex_line(&self, raw: &str, line: usize, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let parts = words(raw);
        let Some(&(col, first)) = parts.first() else { return Ok(()) };
        let trimmed = raw.trim();
        let span = Span::new(line, col);

        if let Some(text) = trimmed.strip_prefix('#') {
            tokens.push(Token::new(TokenKind::Comment(text.trim().to_string()), span));
            return Ok(());
        }

        // Labels first: `Add tens:` names a label, not an ADD.
        if let Some(name) = trimmed.strip_suffix(':') {
            let name = name.trim();
            if name.is_empty() {
                return Err(LexError::EmptyLabel { line, col });
            }
            tokens.push(Token::new(TokenKind::Label(name.to_string()), span));
            return Ok(());
        }

        if let Ok(mnemonic) = Mnemonic::from_str(first) {
            tokens.push(Token::new(TokenKind::Mnemonic(mnemonic), span));
            let rest = &parts[1..];
            if mnemonic.operands() == OperandShape::Label {
                if let Some(&(arg_col, _)) = rest.first() {
                    let label = trimmed[first.len()..].trim().to_string();
                    tokens.push(Token::new(TokenKind::Argument(label), Span::new(line, arg_col)));
                }
            } else {
                for &(arg_col, word) in rest {
                    tokens.push(Token::new(
                        TokenKind::Argument(word.to_string()),
                        Span::new(line, arg_col),
                    ));
                }
            }
            return Ok(());
        }

        Err(LexError::UnknownLine { text: trimmed.to_string(), line, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_simple_program() {
        let src = "# This is a comment\nBEGIN:\nINBOX\nOUTBOX\nJUMP BEGIN";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Comment("This is a comment".into()),
                TokenKind::Label("BEGIN".into()),
                TokenKind::Mnemonic(Mnemonic::Inbox),
                TokenKind::Mnemonic(Mnemonic::Outbox),
                TokenKind::Mnemonic(Mnemonic::Jump),
                TokenKind::Argument("BEGIN".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_spans() {
        let tokens = Lexer::new("\n    copyto  [x]").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span::new(2, 5));
        assert_eq!(tokens[1].span, Span::new(2, 13));
        assert_eq!(tokens[1].kind, TokenKind::Argument("[x]".into()));
    }

    #[test]
    fn test_lex_label_with_spaces() {
        let src = "Write Units:\n  JUMPN Write Units";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Label("Write Units".into()),
                TokenKind::Mnemonic(Mnemonic::JumpN),
                TokenKind::Argument("Write Units".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_label_starting_with_mnemonic() {
        let src = "Add tens:\n  INBOX\n  JUMP Add tens\nInbox loop:";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::Label("Add tens".into()),
                TokenKind::Mnemonic(Mnemonic::Inbox),
                TokenKind::Mnemonic(Mnemonic::Jump),
                TokenKind::Argument("Add tens".into()),
                TokenKind::Label("Inbox loop".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_blank_lines_skipped() {
        assert_eq!(kinds("\n\n   \n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_lex_unknown_line() {
        let err = Lexer::new("INBOX\nMULTIPLY 3").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnknownLine { line: 2, col: 1, .. }));
    }

    #[test]
    fn test_lex_empty_label() {
        let err = Lexer::new("  :").tokenize().unwrap_err();
        assert!(matches!(err, LexError::EmptyLabel { line: 1, col: 3 }));
    }
}
