//! Tagged value representation shared by registers, input and output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value held by the machine: the accumulator, a register, an input or
/// output item, or a register key.
///
/// Integer and text values never compare equal, so `Int(0)` and `Text("0")`
/// name two distinct registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Coerce a literal the way source operands and level files are read:
    /// anything that parses as an integer is an integer, everything else is text.
    pub fn from_literal(literal: &str) -> Self {
        literal
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(literal.to_string()))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Name of the variant, used in fault messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Text(_) => "text",
        }
    }

    /// Debug-style rendering that keeps the type visible (`3` vs `"3"`).
    pub fn display_quoted(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Text(s) => format!("\"{}\"", s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Join values with `", "` for human-readable listings.
pub fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
