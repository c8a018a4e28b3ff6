//! Whole-source compilation: listings, graphs and diagnostics.

use hrm_compiler::diagnostics::format_compile_error;
use hrm_compiler::{compile, compile_source, CompileError};
use hrm_core::{Instruction, RegisterRef, Value};

const DIGITS: &str = "
BEGIN:
    INBOX
    COPYTO x
    # Is < 10?
    SUB 10
    JUMPN Write Units
    JUMP BEGIN
Write Units:
    COPYFROM x
    OUTBOX
    JUMP BEGIN
";

#[test]
fn compiles_labels_with_spaces() {
    let program = compile(DIGITS).unwrap();
    assert_eq!(program.label_index("Write Units"), Some(7));
    assert_eq!(program.get(5), Some(&Instruction::JumpIfNegative("Write Units".into())));
    assert!(program.unresolved_jumps().is_empty());
}

#[test]
fn labels_may_start_with_a_mnemonic() {
    let program = compile("Add tens:\n INBOX\n JUMP Add tens\n").unwrap();
    assert_eq!(program.get(0), Some(&Instruction::Label("Add tens".into())));
    assert_eq!(program.label_index("Add tens"), Some(0));
    assert!(program.unresolved_jumps().is_empty());

    let program = compile("Inbox loop:\n INBOX\n OUTBOX\n JUMP Inbox loop\n").unwrap();
    assert_eq!(program.label_index("Inbox loop"), Some(0));
    assert_eq!(program.get(3), Some(&Instruction::Jump("Inbox loop".into())));
}

#[test]
fn listing_of_compiled_source() {
    let listing = compile(DIGITS).unwrap().render_text();
    let expected = [
        "LABEL: BEGIN",
        "1: INBOX",
        "2: COPYTO x",
        "\"Is < 10?\"",
        "3: SUB 10",
        "4: JUMPN Write Units",
        "5: JUMP BEGIN",
        "LABEL: Write Units",
        "6: COPYFROM x",
        "7: OUTBOX",
        "8: JUMP BEGIN",
    ]
    .join("\n");
    assert_eq!(listing, expected);
}

#[test]
fn integer_and_text_register_keys() {
    let program = compile("COPYTO 0\nCOPYTO zero\nCOPYTO -3\nCOPYTO [0x]").unwrap();
    assert_eq!(
        program.instructions(),
        &[
            Instruction::CopyTo(RegisterRef::direct(0)),
            Instruction::CopyTo(RegisterRef::direct("zero")),
            Instruction::CopyTo(RegisterRef::direct(-3)),
            Instruction::CopyTo(RegisterRef::indirect("0x")),
        ]
    );
}

#[test]
fn assertion_values_are_literals() {
    let program = compile("ASSERT_VALUE -2\nASSERT_REGISTER 4 E").unwrap();
    assert_eq!(
        program.instructions(),
        &[
            Instruction::AssertValueIs(Value::Int(-2)),
            Instruction::AssertRegisterIs(Value::Int(4), Value::from("E")),
        ]
    );
    assert_eq!(program.executable_count(), 0);
}

#[test]
fn source_lines_follow_instructions() {
    let compiled = compile_source(DIGITS).unwrap();
    assert_eq!(compiled.lines.len(), compiled.program.len());
    assert_eq!(compiled.lines[0], 2);
    assert_eq!(compiled.lines[3], 5);
}

#[test]
fn error_diagnostic_points_at_operand() {
    let source = "INBOX\nADD x y\n";
    let err = compile(source).unwrap_err();
    assert!(matches!(err, CompileError::Parse(_)));
    let diag = format_compile_error(&err, source, "bad.hrm");
    assert_eq!((diag.line, diag.col), (Some(2), Some(7)));
    assert_eq!(diag.underline.as_deref(), Some("      ^"));
}
