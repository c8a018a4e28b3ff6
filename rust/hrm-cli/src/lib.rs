//! HRM CLI library.
//!
//! Level loading, configuration, and run reports shared by the `hrm` binary
//! and its tests.

pub mod colors;
pub mod config;
pub mod level;
pub mod report;
