//! The closed instruction set and its textual mnemonics.

use crate::values::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumCount, EnumIter, EnumString};

/// A register operand: the register key plus the indirect-addressing flag.
///
/// With `indirect` set, the value stored under `key` is itself used as the
/// key of the register actually read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterRef {
    pub key: Value,
    pub indirect: bool,
}

impl RegisterRef {
    pub fn direct(key: impl Into<Value>) -> Self {
        Self { key: key.into(), indirect: false }
    }

    pub fn indirect(key: impl Into<Value>) -> Self {
        Self { key: key.into(), indirect: true }
    }
}

impl fmt::Display for RegisterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.indirect {
            write!(f, "[{}]", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// What a mnemonic expects after it on the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    None,
    Register,
    Label,
    Value,
    RegisterAndValue,
}

/// Source mnemonics, matched case-insensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum Mnemonic {
    #[strum(serialize = "INBOX")]
    Inbox,
    #[strum(serialize = "OUTBOX")]
    Outbox,
    #[strum(serialize = "COPYFROM")]
    CopyFrom,
    #[strum(serialize = "COPYTO")]
    CopyTo,
    #[strum(serialize = "ADD")]
    Add,
    #[strum(serialize = "SUB")]
    Sub,
    #[strum(serialize = "BUMPUP")]
    BumpUp,
    #[strum(serialize = "BUMPDN")]
    BumpDn,
    #[strum(serialize = "JUMP")]
    Jump,
    #[strum(serialize = "JUMPZ")]
    JumpZ,
    #[strum(serialize = "JUMPN")]
    JumpN,
    #[strum(serialize = "ASSERT_VALUE")]
    AssertValue,
    #[strum(serialize = "ASSERT_REGISTER")]
    AssertRegister,
}

impl Mnemonic {
    pub fn operands(self) -> OperandShape {
        match self {
            Mnemonic::Inbox | Mnemonic::Outbox => OperandShape::None,
            Mnemonic::CopyFrom
            | Mnemonic::CopyTo
            | Mnemonic::Add
            | Mnemonic::Sub
            | Mnemonic::BumpUp
            | Mnemonic::BumpDn => OperandShape::Register,
            Mnemonic::Jump | Mnemonic::JumpZ | Mnemonic::JumpN => OperandShape::Label,
            Mnemonic::AssertValue => OperandShape::Value,
            Mnemonic::AssertRegister => OperandShape::RegisterAndValue,
        }
    }
}

/// One program instruction.
///
/// `Comment` and `Label` are position markers and never execute; the two
/// assertion variants are self-checks that abort the run on mismatch and are
/// excluded from every instruction count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Comment(String),
    Label(String),
    Inbox,
    Outbox,
    Add(RegisterRef),
    Subtract(RegisterRef),
    CopyTo(RegisterRef),
    CopyFrom(RegisterRef),
    BumpPlus(RegisterRef),
    BumpMinus(RegisterRef),
    Jump(String),
    JumpIfZero(String),
    JumpIfNegative(String),
    AssertValueIs(Value),
    AssertRegisterIs(Value, Value),
}

impl Instruction {
    /// Whether this instruction counts toward the program's size and the
    /// run's execution count.
    pub fn is_executable(&self) -> bool {
        !matches!(
            self,
            Instruction::Comment(_)
                | Instruction::Label(_)
                | Instruction::AssertValueIs(_)
                | Instruction::AssertRegisterIs(..)
        )
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Instruction::AssertValueIs(_) | Instruction::AssertRegisterIs(..))
    }

    pub fn is_jump(&self) -> bool {
        self.jump_target().is_some()
    }

    /// Label named by a jump, if this is one.
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Instruction::Jump(label)
            | Instruction::JumpIfZero(label)
            | Instruction::JumpIfNegative(label) => Some(label),
            _ => None,
        }
    }

    /// Mnemonic used to write this instruction in source, `None` for
    /// comments and labels.
    pub fn mnemonic(&self) -> Option<Mnemonic> {
        let m = match self {
            Instruction::Comment(_) | Instruction::Label(_) => return None,
            Instruction::Inbox => Mnemonic::Inbox,
            Instruction::Outbox => Mnemonic::Outbox,
            Instruction::Add(_) => Mnemonic::Add,
            Instruction::Subtract(_) => Mnemonic::Sub,
            Instruction::CopyTo(_) => Mnemonic::CopyTo,
            Instruction::CopyFrom(_) => Mnemonic::CopyFrom,
            Instruction::BumpPlus(_) => Mnemonic::BumpUp,
            Instruction::BumpMinus(_) => Mnemonic::BumpDn,
            Instruction::Jump(_) => Mnemonic::Jump,
            Instruction::JumpIfZero(_) => Mnemonic::JumpZ,
            Instruction::JumpIfNegative(_) => Mnemonic::JumpN,
            Instruction::AssertValueIs(_) => Mnemonic::AssertValue,
            Instruction::AssertRegisterIs(..) => Mnemonic::AssertRegister,
        };
        Some(m)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Comment(text) => write!(f, "# {}", text),
            Instruction::Label(name) => write!(f, "{}:", name),
            Instruction::Inbox => write!(f, "INBOX"),
            Instruction::Outbox => write!(f, "OUTBOX"),
            Instruction::Add(r) => write!(f, "ADD {}", r),
            Instruction::Subtract(r) => write!(f, "SUB {}", r),
            Instruction::CopyTo(r) => write!(f, "COPYTO {}", r),
            Instruction::CopyFrom(r) => write!(f, "COPYFROM {}", r),
            Instruction::BumpPlus(r) => write!(f, "BUMPUP {}", r),
            Instruction::BumpMinus(r) => write!(f, "BUMPDN {}", r),
            Instruction::Jump(label) => write!(f, "JUMP {}", label),
            Instruction::JumpIfZero(label) => write!(f, "JUMPZ {}", label),
            Instruction::JumpIfNegative(label) => write!(f, "JUMPN {}", label),
            Instruction::AssertValueIs(value) => write!(f, "ASSERT_VALUE {}", value),
            Instruction::AssertRegisterIs(register, value) => {
                write!(f, "ASSERT_REGISTER {} {}", register, value)
            }
        }
    }
}
