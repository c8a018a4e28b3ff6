//! HRM VM: the accumulator machine that runs compiled programs.

pub mod vm;

pub use vm::{
    DebugCallback, DebugEvent, HaltReason, MachineState, Registers, StepOutcome, VmError, VM,
};
