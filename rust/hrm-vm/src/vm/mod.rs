//! Accumulator machine that executes a [`Program`] one instruction at a time.

mod ops;

use hrm_core::{Instruction, Program, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Register file: keys and contents are both [`Value`]s.
pub type Registers = BTreeMap<Value, Value>;

/// Type alias for debug callback to simplify type signatures
pub type DebugCallback = Option<Box<dyn FnMut(&DebugEvent)>>;

/// Debug events emitted during execution, for tracing and step-through tools.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugEvent {
    /// About to execute the instruction at `pc`
    Step { pc: usize, instruction: String },
    /// A value was appended to the output
    Output { value: Value },
    /// The machine reached a terminal halt
    Halt { reason: HaltReason },
}

/// Why a run stopped normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// `INBOX` found no remaining input.
    InputExhausted,
    /// The program counter ran past the last instruction.
    ProgramEnd,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::InputExhausted => write!(f, "input exhausted"),
            HaltReason::ProgramEnd => write!(f, "end of program"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VmError {
    #[error("{instruction}: no value held")]
    NoValue { instruction: String },
    #[error("{instruction}: {operand} must be {expected}, found {found}")]
    TypeMismatch {
        instruction: String,
        operand: String,
        expected: String,
        found: String,
    },
    #[error("register {key} is not set")]
    RegisterNotSet { key: Value },
    #[error("unknown label '{label}'")]
    UnknownLabel { label: String },
    #[error("{instruction}: arithmetic overflow")]
    ArithmeticOverflow { instruction: String },
    #[error("assertion failed: expected {expected}, found {found}")]
    AssertionFailed { expected: String, found: String },
    #[error("step limit exceeded: {0}")]
    StepLimitExceeded(u64),
    #[error("{source} (at instruction {pc}: {instruction})")]
    WithLocation {
        pc: usize,
        instruction: String,
        #[source]
        source: Box<VmError>,
    },
}

impl VmError {
    /// Attach the program counter and instruction text. Never double-wraps.
    pub fn with_location(self, pc: usize, instruction: &Instruction) -> Self {
        if matches!(self, VmError::WithLocation { .. }) {
            return self;
        }
        VmError::WithLocation {
            pc,
            instruction: instruction.to_string(),
            source: Box::new(self),
        }
    }

    /// The fault itself, looking through any location wrapper.
    pub fn root(&self) -> &VmError {
        match self {
            VmError::WithLocation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Program counter the fault was raised at, if known.
    pub fn pc(&self) -> Option<usize> {
        match self {
            VmError::WithLocation { pc, .. } => Some(*pc),
            _ => None,
        }
    }

    pub fn is_step_limit_exceeded(&self) -> bool {
        matches!(self.root(), VmError::StepLimitExceeded(_))
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.root(), VmError::TypeMismatch { .. })
    }

    pub fn is_register_not_set(&self) -> bool {
        matches!(self.root(), VmError::RegisterNotSet { .. })
    }
}

/// Lifecycle of one run.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineState {
    Ready,
    Running,
    Halted(HaltReason),
    Faulted(VmError),
}

impl MachineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MachineState::Halted(_) | MachineState::Faulted(_))
    }
}

/// Result of a successful [`VM::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Continued,
    Halted { reason: HaltReason, output: Vec<Value> },
}

/// The execution engine.
///
/// Registers and input are copied in at construction and kept as the
/// initial state, so a run never mutates the caller's data and [`VM::reset`]
/// can restore it.
pub struct VM {
    program: Program,
    initial_registers: Registers,
    registers: Registers,
    input: Vec<Value>,
    cursor: usize,
    held: Option<Value>,
    pc: usize,
    output: Vec<Value>,
    executions: u64,
    state: MachineState,
    step_limit: Option<u64>,
    pub debug_callback: DebugCallback,
}

impl VM {
    pub fn new(program: Program, registers: &Registers, input: &[Value]) -> Self {
        Self {
            program,
            initial_registers: registers.clone(),
            registers: registers.clone(),
            input: input.to_vec(),
            cursor: 0,
            held: None,
            pc: 0,
            output: Vec::new(),
            executions: 0,
            state: MachineState::Ready,
            step_limit: None,
            debug_callback: None,
        }
    }

    /// Cap the number of counted instructions a run may execute. Unbounded
    /// by default.
    pub fn set_step_limit(&mut self, max_steps: u64) {
        self.step_limit = Some(max_steps);
    }

    /// Return to the initial state: registers as supplied, input rewound,
    /// nothing held, no output.
    pub fn reset(&mut self) {
        self.registers = self.initial_registers.clone();
        self.cursor = 0;
        self.held = None;
        self.pc = 0;
        self.output.clear();
        self.executions = 0;
        self.state = MachineState::Ready;
    }

    fn emit_debug_event(&mut self, event: DebugEvent) {
        if let Some(ref mut cb) = self.debug_callback {
            cb(&event);
        }
    }

    fn halt(&mut self, reason: HaltReason) -> StepOutcome {
        self.state = MachineState::Halted(reason);
        self.emit_debug_event(DebugEvent::Halt { reason });
        StepOutcome::Halted { reason, output: self.output.clone() }
    }

    /// Execute exactly one instruction.
    ///
    /// Once halted, further calls return the same halt without touching any
    /// state; once faulted, they return the same fault.
    pub fn step(&mut self) -> Result<StepOutcome, VmError> {
        match &self.state {
            MachineState::Halted(reason) => {
                return Ok(StepOutcome::Halted { reason: *reason, output: self.output.clone() })
            }
            MachineState::Faulted(err) => return Err(err.clone()),
            MachineState::Ready | MachineState::Running => {}
        }

        let Some(instruction) = self.program.get(self.pc).cloned() else {
            return Ok(self.halt(HaltReason::ProgramEnd));
        };

        if matches!(instruction, Instruction::Inbox) && self.cursor >= self.input.len() {
            return Ok(self.halt(HaltReason::InputExhausted));
        }

        self.state = MachineState::Running;
        self.emit_debug_event(DebugEvent::Step { pc: self.pc, instruction: instruction.to_string() });

        match self.execute(&instruction) {
            Ok(next_pc) => {
                if instruction.is_executable() {
                    self.executions += 1;
                }
                self.pc = next_pc;
                Ok(StepOutcome::Continued)
            }
            Err(err) => {
                let err = err.with_location(self.pc, &instruction);
                self.state = MachineState::Faulted(err.clone());
                Err(err)
            }
        }
    }

    /// Step until the machine halts, returning the output produced.
    ///
    /// Without a step limit a program that loops forever without reading
    /// input never returns.
    pub fn run(&mut self) -> Result<Vec<Value>, VmError> {
        loop {
            if let StepOutcome::Halted { output, .. } = self.step()? {
                return Ok(output);
            }
        }
    }

    /// Execute one instruction and return the next program counter.
    fn execute(&mut self, instruction: &Instruction) -> Result<usize, VmError> {
        if instruction.is_executable() {
            if let Some(limit) = self.step_limit {
                if self.executions >= limit {
                    return Err(VmError::StepLimitExceeded(limit));
                }
            }
        }

        let next = self.pc + 1;
        match instruction {
            Instruction::Comment(_) | Instruction::Label(_) => {}
            Instruction::Inbox => {
                self.held = Some(self.input[self.cursor].clone());
                self.cursor += 1;
            }
            Instruction::Outbox => {
                let value = self.take_held("OUTBOX")?;
                self.output.push(value.clone());
                self.emit_debug_event(DebugEvent::Output { value });
            }
            Instruction::CopyFrom(register) => {
                self.held = Some(self.read_register(register)?);
            }
            Instruction::CopyTo(register) => {
                let value = self.held_value("COPYTO")?.clone();
                self.write_register(register, value)?;
            }
            Instruction::Add(register) => {
                self.arithmetic("ADD", register, i64::checked_add)?;
            }
            Instruction::Subtract(register) => {
                self.arithmetic("SUB", register, i64::checked_sub)?;
            }
            Instruction::BumpPlus(register) => self.bump("BUMPUP", register, 1)?,
            Instruction::BumpMinus(register) => self.bump("BUMPDN", register, -1)?,
            Instruction::Jump(label) => return self.jump_target(label),
            Instruction::JumpIfZero(label) => {
                if self.held_int("JUMPZ")? == 0 {
                    return self.jump_target(label);
                }
            }
            Instruction::JumpIfNegative(label) => {
                if self.held_int("JUMPN")? < 0 {
                    return self.jump_target(label);
                }
            }
            Instruction::AssertValueIs(expected) => {
                let found = self.held.as_ref();
                if found != Some(expected) {
                    return Err(VmError::AssertionFailed {
                        expected: expected.display_quoted(),
                        found: found.map_or_else(|| "nothing".to_string(), Value::display_quoted),
                    });
                }
            }
            Instruction::AssertRegisterIs(key, expected) => {
                let found = self
                    .registers
                    .get(key)
                    .ok_or_else(|| VmError::RegisterNotSet { key: key.clone() })?;
                if found != expected {
                    return Err(VmError::AssertionFailed {
                        expected: format!("register {} = {}", key, expected.display_quoted()),
                        found: found.display_quoted(),
                    });
                }
            }
        }
        Ok(next)
    }

    // -- Accessors ---------------------------------------------------------

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn held(&self) -> Option<&Value> {
        self.held.as_ref()
    }

    /// Counted instructions executed so far in this run.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    /// Static size of the program.
    pub fn instruction_count(&self) -> usize {
        self.program.executable_count()
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn output(&self) -> &[Value] {
        &self.output
    }

    pub fn input(&self) -> &[Value] {
        &self.input
    }

    /// Input items not yet consumed by `INBOX`.
    pub fn remaining_input(&self) -> &[Value] {
        &self.input[self.cursor.min(self.input.len())..]
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn render_text(&self) -> String {
        self.program.render_text()
    }

    pub fn render_graph(&self) -> String {
        self.program.render_graph()
    }
}
