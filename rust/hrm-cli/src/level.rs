//! Level files: program source plus the machine's starting state and
//! scoring targets.
//!
//! ```toml
//! name = "Digit Exploder"
//! speed-challenge = 165
//! size-challenge = 30
//! input = [1, 982, 39, 235]
//! source = """
//! BEGIN:
//!     INBOX
//! """
//!
//! [registers]
//! 0 = 0
//! 10 = 10
//! ```

use hrm_compiler::CompileError;
use hrm_core::Value;
use hrm_vm::{Registers, VM};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("cannot read level '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Level {
    #[serde(default)]
    pub name: Option<String>,
    pub source: String,
    #[serde(default)]
    pub input: Vec<Value>,
    /// TOML keys are always strings; they are read as integers where they
    /// parse as one.
    #[serde(default)]
    registers: BTreeMap<String, Value>,
    #[serde(rename = "speed-challenge")]
    pub speed_challenge: Option<u64>,
    #[serde(rename = "size-challenge")]
    pub size_challenge: Option<usize>,
}

impl Level {
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| LevelError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&content).map_err(|source| LevelError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Initial register file, keys coerced with [`Value::from_literal`].
    pub fn registers(&self) -> Registers {
        self.registers
            .iter()
            .map(|(key, value)| (Value::from_literal(key), value.clone()))
            .collect()
    }

    /// Compile the level's source and load it into a fresh machine.
    pub fn machine(&self) -> Result<VM, CompileError> {
        let program = hrm_compiler::compile(&self.source)?;
        Ok(VM::new(program, &self.registers(), &self.input))
    }
}
