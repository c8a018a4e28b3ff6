//! Configuration file parsing for `hrm.toml`.
//!
//! Searches the current directory then its ancestors. Paths in the file are
//! relative to the directory holding it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "hrm.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HrmConfig {
    /// Directory that relative level paths are looked up in
    #[serde(default = "default_levels_dir")]
    pub levels_dir: PathBuf,
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub log: LogSection,
    /// Directory of the file this was loaded from
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct RunSection {
    /// Abort runs that execute more than this many instructions
    pub max_steps: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct LogSection {
    /// `tracing` filter directive, e.g. `"hrm=debug"`
    pub filter: Option<String>,
}

fn default_levels_dir() -> PathBuf {
    PathBuf::from("levels")
}

impl Default for HrmConfig {
    fn default() -> Self {
        Self {
            levels_dir: default_levels_dir(),
            run: RunSection::default(),
            log: LogSection::default(),
            root: None,
        }
    }
}

impl HrmConfig {
    /// Load config from `hrm.toml`, searching current dir then parents.
    /// Returns `Default` when no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        let Ok(cwd) = std::env::current_dir() else {
            return Ok(Self::default());
        };
        match Self::find(&cwd) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Nearest `hrm.toml` at or above `start`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let mut cfg = Self::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        cfg.root = path.parent().map(Path::to_path_buf);
        Ok(cfg)
    }

    /// Parse a TOML string directly (useful for testing and embedding).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Levels directory, anchored at the config file's directory.
    pub fn levels_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.join(&self.levels_dir),
            None => self.levels_dir.clone(),
        }
    }

    /// Resolve a level argument: absolute paths and paths that exist as
    /// given are used directly, anything else is looked up in the levels
    /// directory, with `.toml` appended when the bare name is missing.
    pub fn resolve_level(&self, arg: &Path) -> PathBuf {
        if arg.is_absolute() || arg.exists() {
            return arg.to_path_buf();
        }
        let candidate = self.levels_dir().join(arg);
        if candidate.extension().is_none() && !candidate.exists() {
            return candidate.with_extension("toml");
        }
        candidate
    }

    /// Generate a default `hrm.toml` template.
    pub fn default_template() -> &'static str {
        r#"# HRM configuration

# Where `hrm run <name>` looks for level files
levels_dir = "levels"

[run]
# Abort runs that execute more instructions than this
# max_steps = 100000

[log]
# tracing filter; RUST_LOG takes precedence
# filter = "info"
"#
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
