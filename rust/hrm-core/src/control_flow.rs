//! Control-flow graph derived from a program, rendered as Graphviz DOT.
//!
//! The graph is a pure projection of the instruction list and its label
//! table; nothing here executes the program. Node order follows instruction
//! order so identical programs always render identically.

use crate::instruction::Instruction;
use crate::program::Program;

// ===========================================================================
// Nodes
// ===========================================================================

/// What a graph node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Jump target marker.
    Label,
    /// Straight-line instruction.
    Operation,
    /// Conditional or unconditional jump.
    Branch,
}

impl NodeKind {
    /// Graphviz shape for this node kind.
    fn dot_shape(&self) -> &'static str {
        match self {
            NodeKind::Label => "ellipse",
            NodeKind::Operation => "box",
            NodeKind::Branch => "diamond",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgNode {
    /// Index of the instruction in the program.
    pub index: usize,
    pub kind: NodeKind,
    pub label: String,
}

impl CfgNode {
    pub fn id(&self) -> String {
        format!("n{}", self.index)
    }
}

// ===========================================================================
// Edges
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Sequential flow to the next node.
    Fallthrough,
    /// Unconditional jump.
    Jump,
    IfZero,
    NotZero,
    IfNegative,
    NotNegative,
}

impl EdgeKind {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            EdgeKind::Fallthrough => None,
            EdgeKind::Jump => Some("jump"),
            EdgeKind::IfZero => Some("if zero"),
            EdgeKind::NotZero => Some("not zero"),
            EdgeKind::IfNegative => Some("if negative"),
            EdgeKind::NotNegative => Some("not negative"),
        }
    }
}

/// Directed edge between two instruction indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgEdge {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
}

// ===========================================================================
// Graph
// ===========================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFlowGraph {
    pub nodes: Vec<CfgNode>,
    pub edges: Vec<CfgEdge>,
}

/// Comments and assertions are invisible to control flow.
fn is_transparent(instruction: &Instruction) -> bool {
    matches!(instruction, Instruction::Comment(_)) || instruction.is_assertion()
}

impl ControlFlowGraph {
    pub fn from_program(program: &Program) -> Self {
        let instructions = program.instructions();
        let mut nodes = Vec::new();
        let mut number = 1;

        for (index, instruction) in instructions.iter().enumerate() {
            if is_transparent(instruction) {
                continue;
            }
            let node = match instruction {
                Instruction::Label(name) => CfgNode {
                    index,
                    kind: NodeKind::Label,
                    label: format!("{}:", name),
                },
                other => {
                    let kind = if other.is_jump() { NodeKind::Branch } else { NodeKind::Operation };
                    let node = CfgNode { index, kind, label: format!("{}: {}", number, other) };
                    number += 1;
                    node
                }
            };
            nodes.push(node);
        }

        let mut edges = Vec::new();
        for (position, node) in nodes.iter().enumerate() {
            let next = nodes.get(position + 1).map(|n| n.index);
            let target = |label: &str| program.label_index(label);
            let mut push = |to: Option<usize>, kind: EdgeKind| {
                if let Some(to) = to {
                    edges.push(CfgEdge { from: node.index, to, kind });
                }
            };

            match &instructions[node.index] {
                Instruction::Jump(label) => push(target(label), EdgeKind::Jump),
                Instruction::JumpIfZero(label) => {
                    push(target(label), EdgeKind::IfZero);
                    push(next, EdgeKind::NotZero);
                }
                Instruction::JumpIfNegative(label) => {
                    push(target(label), EdgeKind::IfNegative);
                    push(next, EdgeKind::NotNegative);
                }
                _ => push(next, EdgeKind::Fallthrough),
            }
        }

        Self { nodes, edges }
    }

    pub fn node(&self, index: usize) -> Option<&CfgNode> {
        self.nodes.iter().find(|n| n.index == index)
    }

    /// Edges leaving the node for instruction `index`.
    pub fn successors(&self, index: usize) -> Vec<&CfgEdge> {
        self.edges.iter().filter(|e| e.from == index).collect()
    }

    // -- Rendering ---------------------------------------------------------

    /// Render the graph as a Graphviz DOT string.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str("digraph G {\n");
        out.push_str("  rankdir=TB;\n");
        out.push_str("  node [shape=box];\n");

        for node in &self.nodes {
            out.push_str(&format!(
                "  {} [label=\"{}\", shape={}];\n",
                node.id(),
                escape_dot(&node.label),
                node.kind.dot_shape(),
            ));
        }

        for edge in &self.edges {
            let label_attr = edge
                .kind
                .label()
                .map(|l| format!(" [label=\"{}\"]", escape_dot(l)))
                .unwrap_or_default();
            out.push_str(&format!("  n{} -> n{}{};\n", edge.from, edge.to, label_attr));
        }

        out.push('}');
        out
    }
}

/// Escape a string for DOT label attributes.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
