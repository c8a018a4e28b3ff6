//! Turns the token stream into a flat instruction list.

use crate::compiler::tokens::{Span, Token, TokenKind};
use hrm_core::{Instruction, Mnemonic, OperandShape, RegisterRef, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{mnemonic} expects {expected} at line {line}, col {col}")]
    MissingOperand { mnemonic: Mnemonic, expected: String, line: usize, col: usize },
    #[error("unexpected {found} at line {line}, col {col}")]
    UnexpectedArgument { found: String, line: usize, col: usize },
    #[error("empty indirect register '[]' at line {line}, col {col}")]
    EmptyIndirect { line: usize, col: usize },
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consume the next token if it is an operand word.
    fn operand(&mut self, mnemonic: Mnemonic, expected: &str, at: Span) -> Result<(String, Span), ParseError> {
        match self.current() {
            Some(Token { kind: TokenKind::Argument(word), span }) => {
                let result = (word.clone(), *span);
                self.advance();
                Ok(result)
            }
            _ => Err(ParseError::MissingOperand {
                mnemonic,
                expected: expected.to_string(),
                line: at.line,
                col: at.col,
            }),
        }
    }

    pub fn parse_program(&mut self) -> Result<Vec<Instruction>, ParseError> {
        Ok(self.parse_spanned()?.into_iter().map(|(instruction, _)| instruction).collect())
    }

    /// Parse every line, keeping the span of the line each instruction came from.
    pub fn parse_spanned(&mut self) -> Result<Vec<(Instruction, Span)>, ParseError> {
        let mut instructions = Vec::new();
        while let Some(tok) = self.advance() {
            let span = tok.span;
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Comment(text) => instructions.push((Instruction::Comment(text), span)),
                TokenKind::Label(name) => instructions.push((Instruction::Label(name), span)),
                TokenKind::Mnemonic(mnemonic) => {
                    instructions.push((self.parse_instruction(mnemonic, span)?, span));
                }
                TokenKind::Argument(word) => {
                    return Err(ParseError::UnexpectedArgument {
                        found: format!("argument '{}'", word),
                        line: span.line,
                        col: span.col,
                    });
                }
            }
        }
        Ok(instructions)
    }

    fn parse_instruction(&mut self, mnemonic: Mnemonic, span: Span) -> Result<Instruction, ParseError> {
        let instruction = match mnemonic.operands() {
            OperandShape::None => match mnemonic {
                Mnemonic::Outbox => Instruction::Outbox,
                _ => Instruction::Inbox,
            },
            OperandShape::Register => {
                let (word, at) = self.operand(mnemonic, "a register", span)?;
                let register = parse_register(&word, at)?;
                match mnemonic {
                    Mnemonic::CopyFrom => Instruction::CopyFrom(register),
                    Mnemonic::CopyTo => Instruction::CopyTo(register),
                    Mnemonic::Add => Instruction::Add(register),
                    Mnemonic::Sub => Instruction::Subtract(register),
                    Mnemonic::BumpUp => Instruction::BumpPlus(register),
                    _ => Instruction::BumpMinus(register),
                }
            }
            OperandShape::Label => {
                let (label, _) = self.operand(mnemonic, "a label", span)?;
                match mnemonic {
                    Mnemonic::Jump => Instruction::Jump(label),
                    Mnemonic::JumpZ => Instruction::JumpIfZero(label),
                    _ => Instruction::JumpIfNegative(label),
                }
            }
            OperandShape::Value => {
                let (word, _) = self.operand(mnemonic, "a value", span)?;
                Instruction::AssertValueIs(Value::from_literal(&word))
            }
            OperandShape::RegisterAndValue => {
                let (register, _) = self.operand(mnemonic, "a register and a value", span)?;
                let (value, _) = self.operand(mnemonic, "a register and a value", span)?;
                Instruction::AssertRegisterIs(Value::from_literal(&register), Value::from_literal(&value))
            }
        };

        if let Some(Token { kind: TokenKind::Argument(word), span }) = self.current() {
            return Err(ParseError::UnexpectedArgument {
                found: format!("argument '{}'", word),
                line: span.line,
                col: span.col,
            });
        }
        Ok(instruction)
    }
}

/// `x` is a direct register, `[x]` an indirect one.
fn parse_register(word: &str, span: Span) -> Result<RegisterRef, ParseError> {
    match word.strip_prefix('[').and_then(|w| w.strip_suffix(']')) {
        Some(inner) if inner.is_empty() => Err(ParseError::EmptyIndirect { line: span.line, col: span.col }),
        Some(inner) => Ok(RegisterRef::indirect(Value::from_literal(inner))),
        None => Ok(RegisterRef::direct(Value::from_literal(word))),
    }
}
