//! End-to-end tests: compile program source and execute it in the VM.

use hrm_compiler::compile;
use hrm_core::Value;
use hrm_vm::{HaltReason, MachineState, Registers, VM};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::Int(v)).collect()
}

/// Helper: compile source and build a VM over the given registers and input.
fn load(source: &str, registers: &[(Value, Value)], input: &[Value]) -> VM {
    let program = compile(source).expect("source should compile");
    let registers: Registers = registers.iter().cloned().collect();
    VM::new(program, &registers, input)
}

// ─── Scenarios ───

#[test]
fn e2e_echo_loop() {
    let input = ints(&[6, 2, 0, 3, 4]);
    let mut vm = load("BEGIN:\n  INBOX\n  OUTBOX\n  JUMP BEGIN\n", &[], &input);
    assert_eq!(vm.run().unwrap(), input);
    assert_eq!(vm.executions(), 15);
    assert_eq!(vm.state(), &MachineState::Halted(HaltReason::InputExhausted));
}

#[test]
fn e2e_indirect_lookup_table() {
    let letters = ["N", "K", "A", "E", "R", "D", "O", "L", "Y", "J"];
    let mut registers: Vec<(Value, Value)> = letters
        .iter()
        .enumerate()
        .map(|(i, l)| (Value::Int(i as i64), Value::from(*l)))
        .collect();
    registers.push((Value::Int(12), Value::Int(8)));

    let source = "
BEGIN:
    INBOX
    COPYTO 12
    COPYFROM [12]
    OUTBOX
    JUMP BEGIN
";
    let mut vm = load(source, &registers, &ints(&[6, 2, 0, 3, 4]));
    let output = vm.run().unwrap();
    let expected: Vec<Value> = ["O", "A", "N", "E", "R"].into_iter().map(Value::from).collect();
    assert_eq!(output, expected);
    assert_eq!(vm.executions(), 25);
    assert_eq!(vm.instruction_count(), 5);
    assert_eq!(vm.registers().get(&Value::Int(12)), Some(&Value::Int(4)));
}

#[test]
fn e2e_indirect_copy_from_only() {
    let registers = [(Value::Int(0), Value::Int(4)), (Value::Int(4), Value::Int(3))];
    let mut vm = load("COPYFROM [0]", &registers, &[]);
    assert_eq!(vm.run().unwrap(), vec![]);
    assert_eq!(vm.held(), Some(&Value::Int(3)));
    assert_eq!(vm.state(), &MachineState::Halted(HaltReason::ProgramEnd));
}

#[test]
fn e2e_countdown() {
    let source = "
# output n, n-1, ..., 0 for every input
next:
    INBOX
    COPYTO n
loop:
    COPYFROM n
    OUTBOX
    COPYFROM n
    JUMPZ next
    BUMPDN n
    JUMP loop
";
    let mut vm = load(source, &[], &ints(&[3, 0]));
    assert_eq!(vm.run().unwrap(), ints(&[3, 2, 1, 0, 0]));
}

#[test]
fn e2e_absolute_value() {
    let source = "
top:
    INBOX
    JUMPN negative
    OUTBOX
    JUMP top
negative:
    COPYTO v
    SUB v
    SUB v
    OUTBOX
    JUMP top
";
    let mut vm = load(source, &[], &ints(&[5, -7, 0]));
    assert_eq!(vm.run().unwrap(), ints(&[5, 7, 0]));
}

#[test]
fn e2e_text_arithmetic_faults() {
    let registers = [(Value::from("B"), Value::Int(3))];
    let mut vm = load("INBOX\nADD B\nOUTBOX", &registers, &[Value::from("A")]);
    let err = vm.run().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("held value must be integer"), "{}", message);
    assert!(message.contains("at instruction 1: ADD B"), "{}", message);
    assert!(vm.output().is_empty());
}

#[test]
fn e2e_assertions_check_intermediate_state() {
    let source = "
INBOX
ASSERT_VALUE 2
COPYTO a
ASSERT_REGISTER a 2
BUMPUP a
ASSERT_REGISTER a 3
OUTBOX
";
    let mut vm = load(source, &[], &ints(&[2]));
    assert_eq!(vm.run().unwrap(), ints(&[3]));
    assert_eq!(vm.executions(), 4);
    assert_eq!(vm.instruction_count(), 4);
}

#[test]
fn e2e_infinite_loop_bounded_by_step_limit() {
    let mut vm = load("spin:\n  JUMP spin\n", &[], &[]);
    vm.set_step_limit(1_000);
    let err = vm.run().unwrap_err();
    assert!(err.is_step_limit_exceeded());
}

#[test]
fn e2e_rerun_after_reset() {
    let registers = [(Value::from("acc"), Value::Int(0))];
    let source = "
loop:
    INBOX
    ADD acc
    COPYTO acc
    OUTBOX
    JUMP loop
";
    let mut vm = load(source, &registers, &ints(&[1, 2, 3]));
    let first = vm.run().unwrap();
    assert_eq!(first, ints(&[1, 3, 6]));
    vm.reset();
    assert_eq!(vm.run().unwrap(), first);
}

#[test]
fn e2e_render_through_vm() {
    let vm = load("BEGIN:\nINBOX\nOUTBOX\nJUMP BEGIN", &[], &[]);
    assert_eq!(vm.render_text(), "LABEL: BEGIN\n1: INBOX\n2: OUTBOX\n3: JUMP BEGIN");
    assert!(vm.render_graph().starts_with("digraph G {\n"));
    assert!(vm.render_graph().contains("n3 -> n0 [label=\"jump\"];"));
}
