//! An immutable instruction sequence with its resolved label table.

use crate::control_flow::ControlFlowGraph;
use crate::instruction::Instruction;
use crate::listing;
use std::collections::{BTreeMap, HashMap};

/// Ordered instructions plus the label → index table, built once.
///
/// Labels are bound here but never validated: a jump to a missing label only
/// faults when it executes. If a label name is defined twice the later
/// definition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    labels: HashMap<String, usize>,
    executable_count: usize,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let executable_count = instructions.iter().filter(|i| i.is_executable()).count();
        let mut labels = HashMap::new();
        for (index, instruction) in instructions.iter().enumerate() {
            if let Instruction::Label(name) = instruction {
                labels.insert(name.clone(), index);
            }
        }
        Self { instructions, labels, executable_count }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Index of the `Label` instruction bearing `name`.
    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn labels(&self) -> &HashMap<String, usize> {
        &self.labels
    }

    /// Static size metric: instructions excluding labels, comments and
    /// assertions.
    pub fn executable_count(&self) -> usize {
        self.executable_count
    }

    /// Label names defined more than once, in first-seen order.
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        let mut order = Vec::new();
        for instruction in &self.instructions {
            if let Instruction::Label(name) = instruction {
                let count = seen.entry(name.as_str()).or_insert(0);
                *count += 1;
                if *count == 2 {
                    order.push(name.clone());
                }
            }
        }
        order
    }

    /// Jumps whose target label is not defined, as `(index, label)`.
    pub fn unresolved_jumps(&self) -> Vec<(usize, String)> {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(index, instruction)| {
                let target = instruction.jump_target()?;
                (!self.labels.contains_key(target)).then(|| (index, target.to_string()))
            })
            .collect()
    }

    /// Human-readable listing, one line per instruction.
    pub fn render_text(&self) -> String {
        listing::render(self)
    }

    pub fn control_flow(&self) -> ControlFlowGraph {
        ControlFlowGraph::from_program(self)
    }

    /// Control-flow graph in Graphviz DOT form.
    pub fn render_graph(&self) -> String {
        self.control_flow().to_dot()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Program::new(instructions)
    }
}
