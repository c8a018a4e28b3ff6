//! HRM Core
//!
//! Values, the instruction set, programs, and the diagnostic renderings
//! (text listing and control-flow graph) shared by the compiler, VM and CLI.

pub mod control_flow;
pub mod instruction;
pub mod listing;
pub mod program;
pub mod values;

pub use instruction::{Instruction, Mnemonic, OperandShape, RegisterRef};
pub use program::Program;
pub use values::Value;
