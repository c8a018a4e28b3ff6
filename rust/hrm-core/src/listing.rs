//! Numbered text listing of a program.

use crate::instruction::Instruction;
use crate::program::Program;

/// Render one line per instruction: comments quoted, labels as
/// `LABEL: name`, executable instructions numbered from 1. Assertions are
/// omitted.
pub fn render(program: &Program) -> String {
    let mut lines = Vec::new();
    let mut index = 1;
    for instruction in program.instructions() {
        match instruction {
            Instruction::AssertValueIs(_) | Instruction::AssertRegisterIs(..) => continue,
            Instruction::Comment(text) => lines.push(format!("\"{}\"", text)),
            Instruction::Label(name) => lines.push(format!("LABEL: {}", name)),
            other => {
                lines.push(format!("{}: {}", index, other));
                index += 1;
            }
        }
    }
    lines.join("\n")
}
